//! Conversation state, request lifecycle and settings.
//!
//! [`app::App`] owns everything the UI displays. The conversation model lives
//! in [`conversation`] and [`message`], the request status in [`status`], and
//! one streaming request at a time runs through [`chat_stream`].

pub mod app;
pub mod chat_stream;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod message;
pub mod status;
