//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use teachwave_core::AdmissionPolicy;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// When unset, lessons are kept in memory for the lifetime of the process.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub allowed_origin: Option<String>,
    pub openai_api_key: Option<String>,
    /// Overrides the OpenAI endpoint for compatible completion services.
    pub completion_base_url: Option<String>,
    pub completion_model: String,
    pub completion_max_tokens: u32,
    pub completion_temperature: f32,
    /// Serve canned lessons instead of calling the completion service.
    pub use_mock_completion: bool,
    pub rate_limit_window: Duration,
    pub rate_limit_max: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let database_url = non_empty(lookup("DATABASE_URL"));
        let allowed_origin = non_empty(lookup("ALLOWED_ORIGIN"));

        // --- Completion Settings ---
        let openai_api_key = non_empty(lookup("OPENAI_API_KEY"));
        let completion_base_url = non_empty(lookup("COMPLETION_BASE_URL"));
        let completion_model =
            lookup("COMPLETION_MODEL").unwrap_or_else(|| "gpt-4.1-mini".to_string());
        let completion_max_tokens = parse_var(&lookup, "COMPLETION_MAX_TOKENS", 1500)?;
        let completion_temperature = parse_var(&lookup, "COMPLETION_TEMPERATURE", 0.7)?;
        let use_mock_completion = parse_var(&lookup, "USE_MOCK_COMPLETION", false)?;

        if !use_mock_completion && openai_api_key.is_none() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY".to_string()));
        }

        // --- Rate Policy ---
        let defaults = AdmissionPolicy::default();
        let window_secs: u64 =
            parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS", defaults.window.as_secs())?;
        if window_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "RATE_LIMIT_WINDOW_SECS".to_string(),
                "window must be at least one second".to_string(),
            ));
        }
        let rate_limit_max = parse_var(&lookup, "RATE_LIMIT_MAX", defaults.max_per_window)?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            allowed_origin,
            openai_api_key,
            completion_base_url,
            completion_model,
            completion_max_tokens,
            completion_temperature,
            use_mock_completion,
            rate_limit_window: Duration::from_secs(window_secs),
            rate_limit_max,
        })
    }

    pub fn admission_policy(&self) -> AdmissionPolicy {
        AdmissionPolicy {
            window: self.rate_limit_window,
            max_per_window: self.rate_limit_max,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses `key` when present, otherwise returns `default`.
fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_mock_completion() {
        let config = config_from(&[("USE_MOCK_COMPLETION", "true")]).unwrap();
        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.completion_model, "gpt-4.1-mini");
        assert_eq!(config.completion_max_tokens, 1500);
        assert!(config.database_url.is_none());
        assert_eq!(config.admission_policy(), AdmissionPolicy::default());
    }

    #[test]
    fn api_key_required_for_live_completion() {
        assert!(matches!(
            config_from(&[]),
            Err(ConfigError::MissingVar(var)) if var == "OPENAI_API_KEY"
        ));
        assert!(config_from(&[("OPENAI_API_KEY", "sk-test")]).is_ok());
    }

    #[test]
    fn rate_policy_is_configurable() {
        let config = config_from(&[
            ("USE_MOCK_COMPLETION", "true"),
            ("RATE_LIMIT_WINDOW_SECS", "10"),
            ("RATE_LIMIT_MAX", "3"),
        ])
        .unwrap();
        let policy = config.admission_policy();
        assert_eq!(policy.window, Duration::from_secs(10));
        assert_eq!(policy.max_per_window, 3);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            config_from(&[("USE_MOCK_COMPLETION", "true"), ("RATE_LIMIT_MAX", "lots")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "RATE_LIMIT_MAX"
        ));
        assert!(matches!(
            config_from(&[("USE_MOCK_COMPLETION", "true"), ("RATE_LIMIT_WINDOW_SECS", "0")]),
            Err(ConfigError::InvalidValue(_, _))
        ));
        assert!(matches!(
            config_from(&[("USE_MOCK_COMPLETION", "true"), ("RUST_LOG", "chatty")]),
            Err(ConfigError::InvalidValue(var, _)) if var == "RUST_LOG"
        ));
    }
}
