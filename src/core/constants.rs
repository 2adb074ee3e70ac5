//! Shared constants used across the application

pub const APP_NAME: &str = "geminal";

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a precise, technical programming assistant. \
Answer directly. When you include code, use fenced code blocks with a language tag. \
Use the search tool when the user refers to a link or to recent documentation.";

pub const DEFAULT_GREETING: &str = "Hello! Send a question, paste some code to review, \
or ask for an explanation. Replies stream in as they are generated.";

/// Text shown in place of a reply when the request fails for any reason.
pub const CONNECTION_ERROR_TEXT: &str =
    "⚠️ Connection to the model failed. Check your API key or try again.";

/// Checked in order; the first one set wins.
pub const API_KEY_ENV_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"];

pub const BASE_URL_ENV_VAR: &str = "GEMINAL_BASE_URL";

pub const LOG_FILTER_ENV_VAR: &str = "GEMINAL_LOG";

