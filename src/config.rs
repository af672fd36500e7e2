use std::fmt;
use std::path::PathBuf;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    MissingVar(&'static str),
    /// The Telegram bot token does not look like a token.
    InvalidToken(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(name) => {
                write!(f, "required environment variable {name} is not set")
            }
            Self::InvalidToken(token) => {
                write!(
                    f,
                    "BOT_TOKEN '{token}' appears invalid (expected format: 123456789:ABCdefGHI...)"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    /// Directory for log files.
    pub log_dir: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let telegram_bot_token = get("BOT_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingVar("BOT_TOKEN"))?;

        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = telegram_bot_token.split(':').collect();
        if token_parts.len() != 2
            || token_parts[0].parse::<u64>().is_err()
            || token_parts[1].is_empty()
        {
            return Err(ConfigError::InvalidToken(telegram_bot_token));
        }

        let openai_api_key = get("OPENAI_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingVar("OPENAI_API_KEY"))?;

        let log_dir = get("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(Self {
            telegram_bot_token,
            openai_api_key,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        Config::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_valid_config() {
        let config = load(&[
            ("BOT_TOKEN", "123456789:ABCdefGHIjklMNOpqrsTUVwxyz"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
        .expect("should load valid config");
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_missing_bot_token() {
        let err = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("BOT_TOKEN")));
    }

    #[test]
    fn test_empty_bot_token() {
        let err = load(&[("BOT_TOKEN", ""), ("OPENAI_API_KEY", "sk-test")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("BOT_TOKEN")));
    }

    #[test]
    fn test_missing_api_key() {
        let err = load(&[("BOT_TOKEN", "123456789:ABCdef")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("OPENAI_API_KEY")));
    }

    #[test]
    fn test_invalid_token_no_colon() {
        let err = load(&[
            ("BOT_TOKEN", "invalid_token_no_colon"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToken(_)));
    }

    #[test]
    fn test_invalid_token_non_numeric_id() {
        let err = load(&[
            ("BOT_TOKEN", "notanumber:ABCdef"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToken(_)));
    }

    #[test]
    fn test_custom_log_dir() {
        let config = load(&[
            ("BOT_TOKEN", "123456789:ABCdef"),
            ("OPENAI_API_KEY", "sk-test"),
            ("LOG_DIR", "/var/log/gptgram"),
        ])
        .unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/var/log/gptgram"));
    }
}
