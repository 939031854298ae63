use std::time::Duration;

use anyhow::{Context, Result};

use crate::emergency::DEFAULT_EMERGENCY_NUMBER;
use crate::llm_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
/// Everything has a default; only malformed values are rejected.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_base_url: String,
    pub gemini_timeout: Duration,
    pub emergency_number: String,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://healthmate.db".to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            gemini_timeout: Duration::from_secs(60),
            emergency_number: DEFAULT_EMERGENCY_NUMBER.to_string(),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let gemini_timeout = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("GEMINI_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => defaults.gemini_timeout,
        };

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            gemini_base_url: lookup("GEMINI_API_BASE_URL").unwrap_or(defaults.gemini_base_url),
            gemini_timeout,
            emergency_number: lookup("EMERGENCY_NUMBER").unwrap_or(defaults.emergency_number),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}
