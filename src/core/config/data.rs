use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::constants::{
    DEFAULT_BASE_URL, DEFAULT_GREETING, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE,
};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Gemini model id (e.g., "gemini-3-pro-preview")
    pub model: Option<String>,
    /// Sampling temperature sent with every request
    pub temperature: Option<f32>,
    /// Enable the Google Search grounding tool
    pub search: Option<bool>,
    /// System instruction sent with every request; empty disables it
    pub system_prompt: Option<String>,
    /// API base URL, without the `models/...` suffix
    pub base_url: Option<String>,
    /// First model message shown in a new conversation; empty disables it
    pub greeting: Option<String>,
    /// Enable syntax highlighting for fenced code blocks
    pub syntax: Option<bool>,
}

impl Config {
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn search_enabled(&self) -> bool {
        self.search.unwrap_or(true)
    }

    pub fn system_prompt_or_default(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// `None` when the greeting was explicitly set to an empty string.
    pub fn greeting_or_default(&self) -> Option<&str> {
        match self.greeting.as_deref() {
            Some(text) if text.trim().is_empty() => None,
            Some(text) => Some(text),
            None => Some(DEFAULT_GREETING),
        }
    }

    pub fn syntax_enabled(&self) -> bool {
        self.syntax.unwrap_or(true)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
