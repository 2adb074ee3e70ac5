//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;

use crate::auth::AuthManager;
use crate::core::app::{App, RequestSettings, SessionContext};
use crate::core::config::keys::parse_temperature;
use crate::core::config::Config;
use crate::core::constants::BASE_URL_ENV_VAR;
use crate::logging::{self, LogTarget};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::LoggingState;

#[derive(Parser)]
#[command(name = "geminal")]
#[command(version)]
#[command(about = "A terminal chat interface for the Gemini API")]
#[command(
    long_about = "geminal is a full-screen terminal chat interface that streams replies from \
Google's Gemini models, with Google Search grounding and highlighted code blocks.\n\n\
Authentication:\n\
  Use 'geminal auth' to store an API key in your system keyring.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY     API key (also GOOGLE_API_KEY or API_KEY); preferred over the keyring\n\
  GEMINAL_BASE_URL   Custom API base URL\n\
  GEMINAL_LOG        Diagnostic log filter, e.g. geminal=debug\n\n\
Controls:\n\
  Enter              Send the message\n\
  Shift/Alt+Enter    Insert a new line\n\
  Up/Down/PgUp/PgDn  Scroll through the conversation\n\
  Ctrl+L             Dismiss notices and errors\n\
  Ctrl+C             Quit the application\n\n\
Commands:\n\
  /help              Show keyboard shortcuts\n\
  /clear             Start a new conversation\n\
  /log <filename>    Enable logging to specified file\n\
  /log               Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

/// Flags that shape a chat session.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Model to use for chat
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature between 0.0 and 2.0
    #[arg(short = 't', long, global = true, value_name = "T", value_parser = parse_temperature_arg)]
    pub temperature: Option<f32>,

    /// Disable the Google Search tool
    #[arg(long, global = true)]
    pub no_search: bool,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one prompt and print the streamed reply
    Say {
        /// Prompt text; multiple words are joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Store an API key in the system keyring
    Auth,
    /// Remove the stored API key
    Deauth,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set; multiple words are joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

fn parse_temperature_arg(value: &str) -> Result<f32, String> {
    parse_temperature(value).map_err(|e| e.to_string())
}

/// Apply precedence: command-line flag, then environment, then config file.
pub fn resolve_session_settings(
    args: &SessionArgs,
    config: &Config,
    env_base_url: Option<String>,
) -> (String, String, RequestSettings) {
    let model = args
        .model
        .as_deref()
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .unwrap_or_else(|| config.model_or_default())
        .to_string();

    let base_url = env_base_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| config.base_url_or_default().to_string());

    let mut settings = RequestSettings::from_config(config);
    if let Some(temperature) = args.temperature {
        settings.temperature = temperature;
    }
    if args.no_search {
        settings.search = false;
    }

    (model, base_url, settings)
}

pub fn build_session(args: &SessionArgs, config: &Config) -> Result<SessionContext, Box<dyn Error>> {
    let resolved = AuthManager::new().resolve_api_key()?;
    let (model, base_url, settings) =
        resolve_session_settings(args, config, std::env::var(BASE_URL_ENV_VAR).ok());

    info!(
        model = %model,
        base_url = %base_url,
        key_source = %resolved.source,
        search = settings.search,
        "session resolved"
    );

    Ok(SessionContext {
        client: reqwest::Client::new(),
        api_key: resolved.key,
        base_url,
        model,
        settings,
    })
}

fn exit_with_error(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("❌ {context}: {err}");
    std::process::exit(1);
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let interactive = matches!(args.command, None | Some(Commands::Chat));
    logging::init(LogTarget::select(interactive, args.debug_log.clone()))?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.unwrap_or(Commands::Chat) {
        Commands::Auth => {
            if let Err(e) = AuthManager::new().interactive_auth() {
                exit_with_error("Authentication failed", e);
            }
            Ok(())
        }
        Commands::Deauth => {
            if let Err(e) = AuthManager::new().interactive_deauth() {
                exit_with_error("Deauthentication failed", e);
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let value = value.join(" ");
            if let Err(e) = config.set_value(&key, &value) {
                exit_with_error("Error", e);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            if let Err(e) = config.unset_value(&key) {
                exit_with_error("Error", e);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Config => {
            Config::load()?.print_all();
            Ok(())
        }
        Commands::Say { prompt } => {
            let config = Config::load()?;
            let session = match build_session(&args.session, &config) {
                Ok(session) => session,
                Err(e) => exit_with_error("Error", e),
            };
            say::run_say(prompt, session).await
        }
        Commands::Chat => {
            let config = Config::load()?;
            let session = match build_session(&args.session, &config) {
                Ok(session) => session,
                Err(e) => exit_with_error("Error", e),
            };
            let logging = LoggingState::new(args.session.log.clone())?;
            let app = App::new(session, &config, logging);
            run_chat(app).await
        }
    }
}

#[cfg(test)]
mod tests;
