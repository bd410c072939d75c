//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ADVISOR_CHAT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use advisor_chat::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Primary provider: {:?}", config.ai.primary_provider);
//! ```

mod ai;
mod chat;
mod error;
mod logging;

pub use ai::{AiConfig, AiProvider};
pub use chat::ChatConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads; whether it
/// validates depends on the chosen provider having a key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI provider configuration (Anthropic/OpenAI/mock)
    #[serde(default)]
    pub ai: AiConfig,

    /// Completion request tuning
    #[serde(default)]
    pub chat: ChatConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ADVISOR_CHAT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ADVISOR_CHAT__AI__PRIMARY_PROVIDER=openai` -> `ai.primary_provider = openai`
    /// - `ADVISOR_CHAT__CHAT__MAX_TOKENS=512` -> `chat.max_tokens = 512`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ADVISOR_CHAT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.chat.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "ADVISOR_CHAT__AI__PRIMARY_PROVIDER",
        "ADVISOR_CHAT__AI__ANTHROPIC_API_KEY",
        "ADVISOR_CHAT__AI__TIMEOUT_SECS",
        "ADVISOR_CHAT__CHAT__MAX_TOKENS",
        "ADVISOR_CHAT__CHAT__TEMPERATURE",
        "ADVISOR_CHAT__LOGGING__JSON",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        clear_env();
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.ai.primary_provider, AiProvider::Anthropic);
        assert_eq!(config.chat.max_tokens, 1024);
        assert_eq!(config.logging.filter, "advisor_chat=info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("ADVISOR_CHAT__AI__ANTHROPIC_API_KEY", "sk-ant-xxx"),
            ("ADVISOR_CHAT__AI__TIMEOUT_SECS", "30"),
            ("ADVISOR_CHAT__CHAT__MAX_TOKENS", "512"),
            ("ADVISOR_CHAT__CHAT__TEMPERATURE", "0.2"),
            ("ADVISOR_CHAT__LOGGING__JSON", "true"),
        ])
        .unwrap();

        assert_eq!(config.ai.anthropic_api_key.as_deref(), Some("sk-ant-xxx"));
        assert_eq!(config.ai.timeout_secs, 30);
        assert_eq!(config.chat.max_tokens, 512);
        assert!((config.chat.temperature - 0.2).abs() < f32::EPSILON);
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mock_provider_validates_without_keys() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("ADVISOR_CHAT__AI__PRIMARY_PROVIDER", "mock")]).unwrap();

        assert_eq!(config.ai.primary_provider, AiProvider::Mock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_missing_key() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        ));
    }

    #[test]
    fn test_validation_error_converts_to_config_error() {
        let err = AppConfig::default()
            .validate()
            .map_err(ConfigError::from)
            .unwrap_err();

        assert!(matches!(err, ConfigError::ValidationFailed(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: Required configuration missing: ANTHROPIC_API_KEY"
        );
    }
}
