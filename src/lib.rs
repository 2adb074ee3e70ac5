//! geminal is a full-screen terminal chat client for Google's Gemini models.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation, the four-state request status, settings,
//!   and the streaming request that fills in each reply.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`commands`] implements the slash commands handled locally by the chat
//!   loop.
//! - [`api`] defines the request and response payloads of the Gemini REST API.
//! - [`auth`] finds the API key in the environment or the system keyring.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which initializes [`logging`] and dispatches
//! into [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
