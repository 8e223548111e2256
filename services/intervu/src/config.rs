//! Application Configuration Module
//!
//! Loads the service settings from environment variables (and `.env`) into a
//! single struct that `main` hands to the pieces it wires together.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_VAPI_BASE_URL: &str = "wss://api.vapi.ai";
pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";
pub const DEFAULT_ERROR_GRACE_SECS: u64 = 10;
pub const MAX_ERROR_GRACE_SECS: u64 = 24 * 60 * 60;

/// Holds all configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub vapi_web_token: Option<String>,
    pub vapi_base_url: String,
    pub app_base_url: String,
    pub prompts_dir: PathBuf,
    /// `None` when `CALL_ERROR_GRACE_SECS` is `0`.
    pub error_grace: Option<Duration>,
    pub log_level: Level,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    // *   `VAPI_WEB_TOKEN`: Voice API token. Only the `interview` command needs it.
    // *   `VAPI_BASE_URL`: (Optional) Voice WebSocket base URL. Defaults to "wss://api.vapi.ai".
    // *   `APP_BASE_URL`: (Optional) Base URL of the feedback and generate endpoints.
    // *   `PROMPTS_DIR`: (Optional) Directory of `*.md` prompts. Defaults to "prompts".
    // *   `CALL_ERROR_GRACE_SECS`: (Optional) Seconds to wait for call-end after an error. `0` disables, at most a day.
    // *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vapi_web_token = lookup("VAPI_WEB_TOKEN").filter(|token| !token.trim().is_empty());
        let vapi_base_url =
            lookup("VAPI_BASE_URL").unwrap_or_else(|| DEFAULT_VAPI_BASE_URL.to_string());
        let app_base_url =
            lookup("APP_BASE_URL").unwrap_or_else(|| DEFAULT_APP_BASE_URL.to_string());
        let prompts_dir = PathBuf::from(
            lookup("PROMPTS_DIR").unwrap_or_else(|| DEFAULT_PROMPTS_DIR.to_string()),
        );

        let error_grace = match lookup("CALL_ERROR_GRACE_SECS") {
            None => Some(Duration::from_secs(DEFAULT_ERROR_GRACE_SECS)),
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs <= MAX_ERROR_GRACE_SECS)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        name: "CALL_ERROR_GRACE_SECS".to_string(),
                        value: value.clone(),
                    })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidValue {
                name: "RUST_LOG".to_string(),
                value: log_level_str,
            })?;

        Ok(Self {
            vapi_web_token,
            vapi_base_url,
            app_base_url,
            prompts_dir,
            error_grace,
            log_level,
        })
    }

    /// The voice token, which only live calls need.
    pub fn require_vapi_token(&self) -> Result<&str, ConfigError> {
        self.vapi_web_token.as_deref().ok_or_else(|| {
            ConfigError::MissingVar("VAPI_WEB_TOKEN must be set for interview calls".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.vapi_base_url, DEFAULT_VAPI_BASE_URL);
        assert_eq!(config.app_base_url, DEFAULT_APP_BASE_URL);
        assert_eq!(config.prompts_dir, PathBuf::from("prompts"));
        assert_eq!(config.error_grace, Some(Duration::from_secs(10)));
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.require_vapi_token().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("VAPI_WEB_TOKEN", "tok"),
            ("APP_BASE_URL", "https://prep.example.com"),
            ("CALL_ERROR_GRACE_SECS", "3"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.require_vapi_token().unwrap(), "tok");
        assert_eq!(config.app_base_url, "https://prep.example.com");
        assert_eq!(config.error_grace, Some(Duration::from_secs(3)));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_zero_grace_disables_timer() {
        let config = Config::from_lookup(lookup(&[("CALL_ERROR_GRACE_SECS", "0")])).unwrap();
        assert_eq!(config.error_grace, None);
    }

    #[test]
    fn test_grace_longer_than_a_day_is_rejected() {
        let err = Config::from_lookup(lookup(&[("CALL_ERROR_GRACE_SECS", "18446744073709551615")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "CALL_ERROR_GRACE_SECS"));

        let config = Config::from_lookup(lookup(&[("CALL_ERROR_GRACE_SECS", "86400")])).unwrap();
        assert_eq!(config.error_grace, Some(Duration::from_secs(MAX_ERROR_GRACE_SECS)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[("CALL_ERROR_GRACE_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "CALL_ERROR_GRACE_SECS"));

        let err = Config::from_lookup(lookup(&[("RUST_LOG", "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "RUST_LOG"));
    }

    #[test]
    fn test_blank_token_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[("VAPI_WEB_TOKEN", "  ")])).unwrap();
        assert!(matches!(
            config.require_vapi_token(),
            Err(ConfigError::MissingVar(_))
        ));
    }
}
