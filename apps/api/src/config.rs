use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if either upstream API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub rapidapi_key: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// Sessions untouched for this long are dropped.
    pub session_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_upload_mb = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<usize>()
            .context("MAX_UPLOAD_MB must be a whole number of megabytes")?;

        let idle_minutes = std::env::var("SESSION_IDLE_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?;

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            rapidapi_key: require_env("RAPIDAPI_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            session_idle_timeout: Duration::from_secs(idle_minutes * 60),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value =
        std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_missing_names_the_variable() {
        let err = require_env("RECRUITIFY_TEST_SURELY_UNSET_VAR").unwrap_err();
        assert!(err.to_string().contains("RECRUITIFY_TEST_SURELY_UNSET_VAR"));
    }

    #[test]
    fn test_require_env_rejects_blank_value() {
        std::env::set_var("RECRUITIFY_TEST_BLANK_VAR", "   ");
        let err = require_env("RECRUITIFY_TEST_BLANK_VAR").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_require_env_present() {
        std::env::set_var("RECRUITIFY_TEST_PRESENT_VAR", "secret");
        assert_eq!(require_env("RECRUITIFY_TEST_PRESENT_VAR").unwrap(), "secret");
    }
}
