//! API key storage and lookup.
//!
//! Keys are read from the environment first and fall back to the system
//! keyring, where `geminal auth` stores them.

use keyring::Entry;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use tracing::debug;

use crate::core::constants::{API_KEY_ENV_VARS, APP_NAME};

const KEYRING_USER: &str = "gemini-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySource {
    Environment(&'static str),
    Keyring,
}

impl fmt::Display for ApiKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKeySource::Environment(var) => write!(f, "environment ({var})"),
            ApiKeySource::Keyring => write!(f, "system keyring"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedApiKey {
    pub key: String,
    pub source: ApiKeySource,
}

#[derive(Debug)]
pub enum AuthError {
    /// Neither the environment nor the keyring holds a key.
    MissingKey,
    /// The keyring backend could not be reached.
    Keyring(keyring::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingKey => write!(
                f,
                "No API key configured.\n\n\
Please either:\n\
1. Run '{APP_NAME} auth' to store a key in the system keyring, or\n\
2. Set an environment variable:\n   \
export GEMINI_API_KEY=\"your-api-key-here\""
            ),
            AuthError::Keyring(err) => write!(f, "Keyring access failed: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AuthError::MissingKey => None,
            AuthError::Keyring(err) => Some(err),
        }
    }
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::Keyring(err)
    }
}

/// First non-empty key among the known environment variables.
pub fn key_from_env<F>(lookup: F) -> Option<ResolvedApiKey>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS.iter().find_map(|var| {
        let value = lookup(var)?;
        let key = value.trim();
        (!key.is_empty()).then(|| ResolvedApiKey {
            key: key.to_string(),
            source: ApiKeySource::Environment(var),
        })
    })
}

pub struct AuthManager {
    service: String,
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthManager {
    pub fn new() -> Self {
        Self {
            service: APP_NAME.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, AuthError> {
        Ok(Entry::new(&self.service, KEYRING_USER)?)
    }

    pub fn store_key(&self, key: &str) -> Result<(), AuthError> {
        self.entry()?.set_password(key)?;
        debug!("api key stored in keyring");
        Ok(())
    }

    pub fn get_key(&self) -> Result<Option<String>, AuthError> {
        match self.entry()?.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AuthError::Keyring(e)),
        }
    }

    /// Returns false when there was nothing to remove.
    pub fn remove_key(&self) -> Result<bool, AuthError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(AuthError::Keyring(e)),
        }
    }

    /// Environment first, then the keyring.
    pub fn resolve_api_key(&self) -> Result<ResolvedApiKey, AuthError> {
        if let Some(resolved) = key_from_env(|var| std::env::var(var).ok()) {
            return Ok(resolved);
        }

        match self.get_key()? {
            Some(key) if !key.trim().is_empty() => Ok(ResolvedApiKey {
                key: key.trim().to_string(),
                source: ApiKeySource::Keyring,
            }),
            _ => Err(AuthError::MissingKey),
        }
    }

    pub fn interactive_auth(&self) -> Result<(), Box<dyn Error>> {
        println!("🔐 {APP_NAME} authentication setup");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!();

        if self.get_key()?.is_some() {
            println!("A key is already stored; entering a new one replaces it.");
        }

        print!("Enter your Gemini API key: ");
        io::stdout().flush()?;

        let mut key = String::new();
        io::stdin().read_line(&mut key)?;
        let key = key.trim();

        if key.is_empty() {
            return Err("API key cannot be empty".into());
        }

        self.store_key(key)?;
        println!();
        println!("✅ API key stored securely in the system keyring.");
        Ok(())
    }

    pub fn interactive_deauth(&self) -> Result<(), Box<dyn Error>> {
        if self.remove_key()? {
            println!("✅ Removed the stored API key.");
        } else {
            println!("No stored API key to remove.");
        }
        Ok(())
    }
}
