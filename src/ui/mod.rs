//! Terminal UI layer for the interactive session.
//!
//! - [`chat_loop`]: terminal setup and the draw/poll/drain loop.
//! - [`renderer`]: frame layout, title bar, notice row and input box.
//! - [`transcript`]: message headers, bodies, code frames and sources.
//! - [`markdown`]: prose/code segmentation of message text.
//!
//! This layer only presents and captures interaction state; [`crate::core`]
//! owns the conversation and the request lifecycle.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod transcript;
