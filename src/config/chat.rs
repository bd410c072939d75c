//! Conversation tuning

use serde::Deserialize;

use super::error::ValidationError;

/// Settings applied to every completion request
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Replaces the built-in behavioral preamble when set
    pub preamble: Option<String>,

    /// Maximum tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl ChatConfig {
    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=8192).contains(&self.max_tokens) {
            return Err(ValidationError::InvalidMaxTokens);
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }

        if self.preamble.as_ref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ValidationError::EmptyPreamble);
        }

        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            preamble: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}
