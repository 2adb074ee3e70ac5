use crate::core::app::{App, RequestSettings, SessionContext};
use crate::core::config::Config;
use crate::core::message::MessageId;
use crate::utils::logging::LoggingState;

pub fn create_test_app() -> App {
    let config = Config::default();
    let session = SessionContext {
        client: reqwest::Client::new(),
        api_key: "test-key".to_string(),
        base_url: "https://api.test.com/v1beta".to_string(),
        model: "test-model".to_string(),
        settings: RequestSettings::from_config(&config),
    };

    App::new(session, &config, LoggingState::disabled())
}

/// Submit `text` and return the placeholder id the stream events target.
pub fn start_test_stream(app: &mut App, text: &str) -> MessageId {
    app.submit_message(text)
        .expect("message should be accepted")
        .stream_id
}

pub const SAMPLE_RUST_REPLY: &str = "Use an iterator:\n\n```rust\nlet total: i32 = xs.iter().sum();\n```\n\nThat avoids the manual loop.";
