use crate::core::config::data::Config;
use crate::core::config::io::ConfigError;

/// Keys accepted by `geminal set` / `geminal unset`.
pub const CONFIG_KEYS: [&str; 7] = [
    "model",
    "temperature",
    "search",
    "system-prompt",
    "base-url",
    "greeting",
    "syntax",
];

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected on or off",
        }),
    }
}

pub fn parse_temperature(value: &str) -> Result<f32, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        key: "temperature".to_string(),
        value: value.to_string(),
        reason,
    };
    let parsed: f32 = value
        .trim()
        .parse()
        .map_err(|_| invalid("expected a number"))?;
    if !(0.0..=2.0).contains(&parsed) {
        return Err(invalid("must be between 0.0 and 2.0"));
    }
    Ok(parsed)
}

impl Config {
    /// Set a key from its command-line spelling. Multi-word values are
    /// joined by the caller.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "model" => {
                let model = value.trim();
                if model.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        reason: "model id cannot be empty",
                    });
                }
                self.model = Some(model.to_string());
            }
            "temperature" => self.temperature = Some(parse_temperature(value)?),
            "search" => self.search = Some(parse_bool(key, value)?),
            "syntax" => self.syntax = Some(parse_bool(key, value)?),
            "system-prompt" => self.system_prompt = Some(value.to_string()),
            "base-url" => {
                let url = value.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        reason: "expected an http(s) URL",
                    });
                }
                self.base_url = Some(url.to_string());
            }
            "greeting" => self.greeting = Some(value.to_string()),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "model" => self.model = None,
            "temperature" => self.temperature = None,
            "search" => self.search = None,
            "syntax" => self.syntax = None,
            "system-prompt" => self.system_prompt = None,
            "base-url" => self.base_url = None,
            "greeting" => self.greeting = None,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
