//! Diagnostic logging via `tracing`.
//!
//! The full-screen UI owns the terminal, so interactive sessions only log
//! when a `--debug-log` file is given. Line-oriented commands log to stderr.

use std::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::constants::LOG_FILTER_ENV_VAR;

const DEFAULT_FILTER: &str = "geminal=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    pub fn select(interactive: bool, debug_log: Option<PathBuf>) -> Self {
        match (debug_log, interactive) {
            (Some(path), _) => LogTarget::File(path),
            (None, true) => LogTarget::Off,
            (None, false) => LogTarget::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Call once, before any work starts.
pub fn init(target: LogTarget) -> Result<(), Box<dyn Error>> {
    match target {
        LogTarget::Off => {}
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .try_init()?;
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::registry()
                .with(env_filter())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?;
        }
    }
    Ok(())
}
