use std::time::Instant;

use ratatui::text::Line;
use reqwest::Client;
use tracing::{debug, info, warn};
use tui_textarea::TextArea;

use crate::api::GenerateContentRequest;
use crate::commands::{process_input, CommandResult};
use crate::core::chat_stream::{error_headline, StreamMessage, StreamParams};
use crate::core::config::Config;
use crate::core::constants::CONNECTION_ERROR_TEXT;
use crate::core::conversation::Conversation;
use crate::core::message::MessageId;
use crate::core::status::ModelStatus;
use crate::ui::markdown::{segments, Segment};
use crate::ui::transcript::build_display_lines;
use crate::utils::clipboard::ClipboardError;
use crate::utils::logging::LoggingState;

/// Per-request settings sent alongside the history.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSettings {
    pub system_prompt: String,
    pub temperature: f32,
    pub search: bool,
}

impl RequestSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            system_prompt: config.system_prompt_or_default().to_string(),
            temperature: config.temperature_or_default(),
            search: config.search_enabled(),
        }
    }
}

/// Everything needed to reach the API.
pub struct SessionContext {
    pub client: Client,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub settings: RequestSettings,
}

pub struct App {
    pub session: SessionContext,
    pub conversation: Conversation,
    pub status: ModelStatus,
    pub input: TextArea<'static>,
    pub logging: LoggingState,
    pub syntax_enabled: bool,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    /// Detail of the most recent failure, kept until the next send.
    pub last_error: Option<String>,
    /// One-off feedback from slash commands.
    pub notice: Option<String>,
    pub pulse_start: Instant,
    pub exit_requested: bool,
    active_stream: Option<MessageId>,
    current_response: String,
}

impl App {
    pub fn new(session: SessionContext, config: &Config, logging: LoggingState) -> Self {
        let greeting = config.greeting_or_default().map(str::to_string);
        App {
            session,
            conversation: Conversation::new(greeting),
            status: ModelStatus::Idle,
            input: TextArea::default(),
            logging,
            syntax_enabled: config.syntax_enabled(),
            scroll_offset: 0,
            auto_scroll: true,
            last_error: None,
            notice: None,
            pulse_start: Instant::now(),
            exit_requested: false,
            active_stream: None,
            current_response: String::new(),
        }
    }

    pub fn active_stream(&self) -> Option<MessageId> {
        self.active_stream
    }

    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = TextArea::from(text.lines().map(str::to_string).collect::<Vec<_>>());
    }

    pub fn clear_input(&mut self) {
        self.input = TextArea::default();
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn dismiss_notices(&mut self) {
        self.notice = None;
        self.last_error = None;
    }

    /// Handle Enter in the input box.
    ///
    /// While a reply is pending the input is disabled and nothing happens.
    /// Slash commands are run locally; anything else is sent.
    pub fn submit_input(&mut self) -> Option<StreamParams> {
        if self.status.is_busy() {
            return None;
        }

        let text = self.input_text();
        if text.trim().is_empty() {
            return None;
        }

        match process_input(self, &text) {
            CommandResult::Continue => {
                self.clear_input();
                None
            }
            CommandResult::ProcessAsMessage(message) => {
                let params = self.submit_message(&message)?;
                self.clear_input();
                Some(params)
            }
        }
    }

    /// Append the user turn and a placeholder, then build the request.
    ///
    /// Returns `None`, leaving all state untouched, for blank input or while
    /// another reply is pending.
    pub fn submit_message(&mut self, text: &str) -> Option<StreamParams> {
        if !self.status.accepts_input() {
            return None;
        }

        let turn = self.conversation.submit(text)?;
        let user_message = self
            .conversation
            .messages()
            .iter()
            .rev()
            .find(|msg| msg.is_user());
        if let Some(user_message) = user_message {
            if let Err(e) = self.logging.log_turn(user_message) {
                warn!("Failed to log message: {e}");
            }
        }

        self.status = ModelStatus::Thinking;
        self.active_stream = Some(turn.placeholder_id);
        self.current_response.clear();
        self.last_error = None;
        self.notice = None;
        self.pulse_start = Instant::now();
        self.auto_scroll = true;

        debug!(
            placeholder = %turn.placeholder_id,
            turns = turn.history.len(),
            "message submitted"
        );

        let settings = &self.session.settings;
        let request = GenerateContentRequest::new(
            turn.history,
            &settings.system_prompt,
            Some(settings.temperature),
            settings.search,
        );

        Some(StreamParams {
            client: self.session.client.clone(),
            base_url: self.session.base_url.clone(),
            api_key: self.session.api_key.clone(),
            model: self.session.model.clone(),
            request,
            stream_id: turn.placeholder_id,
        })
    }

    /// Apply one stream event. Events for anything but the active stream are
    /// dropped.
    pub fn handle_stream_message(&mut self, message: StreamMessage, stream_id: MessageId) {
        if self.active_stream != Some(stream_id) {
            return;
        }

        match message {
            StreamMessage::Chunk(chunk) => {
                if chunk.is_empty() {
                    return;
                }
                self.current_response.push_str(&chunk);
                self.conversation
                    .set_text(stream_id, &self.current_response);
                self.status = ModelStatus::Streaming;
            }
            StreamMessage::Sources(sources) => {
                self.conversation.attach_sources(stream_id, sources);
            }
            StreamMessage::Error(detail) => {
                warn!(stream = %stream_id, "{}", error_headline(&detail));
                self.conversation.fail(stream_id, CONNECTION_ERROR_TEXT);
                self.status = ModelStatus::Error;
                self.last_error = Some(detail);
                self.active_stream = None;
                self.current_response.clear();
            }
            StreamMessage::End => {
                self.conversation.finish(stream_id);
                self.status = ModelStatus::Idle;
                self.active_stream = None;
                info!(
                    stream = %stream_id,
                    chars = self.current_response.chars().count(),
                    "reply complete"
                );
                if let Some(reply) = self.conversation.get(stream_id) {
                    if let Err(e) = self.logging.log_turn(reply) {
                        warn!("Failed to log response: {e}");
                    }
                }
                self.current_response.clear();
            }
        }
    }

    /// Last code block of the newest non-error message that has one.
    pub fn latest_code_block(&self) -> Option<String> {
        self.conversation
            .messages()
            .iter()
            .rev()
            .filter(|message| !message.is_error)
            .find_map(|message| {
                segments(&message.text)
                    .into_iter()
                    .rev()
                    .find_map(|segment| match segment {
                        Segment::Code { code, .. } => Some(code),
                        Segment::Prose(_) => None,
                    })
            })
    }

    /// Hand the latest code block to `copy` and report the outcome as a notice.
    pub fn copy_latest_code_block<F>(&mut self, copy: F)
    where
        F: FnOnce(&str) -> Result<(), ClipboardError>,
    {
        let Some(code) = self.latest_code_block() else {
            self.set_notice("No code block to copy.");
            return;
        };
        match copy(&code) {
            Ok(()) => {
                let lines = code.lines().count().max(1);
                debug!(lines, "copied code block");
                let unit = if lines == 1 { "line" } else { "lines" };
                self.set_notice(format!("Copied code block ({lines} {unit})."));
            }
            Err(e) => {
                warn!("Clipboard copy failed: {e}");
                self.set_notice(format!("Clipboard error: {e}"));
            }
        }
    }

    pub fn clear_conversation(&mut self) -> bool {
        if self.status.is_busy() || !self.conversation.clear() {
            return false;
        }
        if let Err(e) = self.logging.log_message("## Conversation cleared") {
            warn!("Failed to log message: {e}");
        }
        self.status = ModelStatus::Idle;
        self.last_error = None;
        self.scroll_offset = 0;
        self.auto_scroll = true;
        true
    }

    pub fn build_display_lines(&self, terminal_width: u16) -> Vec<Line<'static>> {
        build_display_lines(
            self.conversation.messages(),
            self.status,
            self.syntax_enabled,
            terminal_width,
        )
    }

    /// Display lines are pre-wrapped, so each one is a single row.
    pub fn calculate_wrapped_line_count(&self, terminal_width: u16) -> u16 {
        u16::try_from(self.build_display_lines(terminal_width).len()).unwrap_or(u16::MAX)
    }

    pub fn calculate_max_scroll_offset(&self, available_height: u16, terminal_width: u16) -> u16 {
        self.calculate_wrapped_line_count(terminal_width)
            .saturating_sub(available_height)
    }

    /// Keep the newest content in view unless the user scrolled away.
    pub fn update_scroll_position(&mut self, available_height: u16, terminal_width: u16) {
        if self.auto_scroll {
            self.scroll_offset = self.calculate_max_scroll_offset(available_height, terminal_width);
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16, available_height: u16, terminal_width: u16) {
        let max_scroll = self.calculate_max_scroll_offset(available_height, terminal_width);
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max_scroll);
        if self.scroll_offset >= max_scroll {
            self.auto_scroll = true;
        }
    }
}
