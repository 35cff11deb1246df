use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_DISTRACTOR_COUNT: usize = 4;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub database_path: PathBuf,
    pub distractor_count: usize,
    pub poll_timeout: Duration,
    pub seed_shared_words: bool,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = var("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing {
            key: "TELEGRAM_BOT_TOKEN",
        })?;

        let database_path = var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let distractor_count = parse_or(var("DISTRACTOR_COUNT"), DEFAULT_DISTRACTOR_COUNT).max(1);
        let poll_timeout = Duration::from_secs(parse_or(var("POLL_TIMEOUT_SECS"), DEFAULT_POLL_TIMEOUT_SECS));
        let seed_shared_words = bool_or(var("SEED_SHARED_WORDS"), true);
        let log_level = var("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let enable_file_logs = bool_or(var("ENABLE_FILE_LOGS"), false);
        let log_dir = PathBuf::from(var("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string()));

        Ok(Self {
            bot_token,
            database_path,
            distractor_count,
            poll_timeout,
            seed_shared_words,
            log_level,
            enable_file_logs,
            log_dir,
        })
    }
}

pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flashcard-bot")
        .join("words.db")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {key}")]
    Missing { key: &'static str },
}

fn bool_or(value: Option<String>, default: bool) -> bool {
    value
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|value| value.parse().ok()).unwrap_or(default)
}
