//! URL utilities for consistent URL handling
//!
//! Base URLs come from config, environment, or the built-in default and may
//! or may not carry a trailing slash; these helpers normalize them before
//! endpoints are appended.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use geminal::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.example.com/v1beta"), "https://api.example.com/v1beta");
/// assert_eq!(normalize_base_url("https://api.example.com/v1beta/"), "https://api.example.com/v1beta");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// # Examples
///
/// ```
/// use geminal::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.example.com/v1beta/", "/models"),
///     "https://api.example.com/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Server-sent-events endpoint for a streamed generation with `model`.
///
/// A `models/` prefix on the model id is tolerated, since the API lists
/// models under that name.
pub fn stream_generate_url(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(
        base_url,
        &format!("models/{model}:streamGenerateContent?alt=sse"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1"),
            "https://api.example.com/v1"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/v1///"),
            "https://api.example.com/v1"
        );
        assert_eq!(normalize_base_url(""), "");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("https://api.example.com/v1", "models"),
            "https://api.example.com/v1/models"
        );
        assert_eq!(
            construct_api_url("https://api.example.com/v1///", "///models"),
            "https://api.example.com/v1/models"
        );
    }

    #[test]
    fn test_stream_generate_url() {
        let expected = "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-preview:streamGenerateContent?alt=sse";
        assert_eq!(
            stream_generate_url(
                "https://generativelanguage.googleapis.com/v1beta/",
                "gemini-3-pro-preview"
            ),
            expected
        );
        assert_eq!(
            stream_generate_url(
                "https://generativelanguage.googleapis.com/v1beta",
                "models/gemini-3-pro-preview"
            ),
            expected
        );
    }
}
