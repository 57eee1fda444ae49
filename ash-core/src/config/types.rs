//! Application configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::hardware::{DisplayConfig, ServoConfig};
use crate::expression::Expression;

/// Speech input and output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Seconds to wait for speech to start
    pub timeout: u32,
    /// Longest phrase recorded, in seconds
    pub phrase_time_limit: u32,
    /// BCP 47 language tag
    pub language: String,
    /// Speak slowly
    pub tts_slow: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            timeout: 5,
            phrase_time_limit: 10,
            language: "en-US".to_string(),
            tts_slow: false,
        }
    }
}

/// Language model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub system_instruction: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            system_instruction: "You are Ash, a friendly desktop robot companion. \
                Give very concise answers in 1-2 sentences."
                .to_string(),
            max_tokens: 150,
            temperature: 0.7,
        }
    }
}

/// Loop timing and startup face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainConfig {
    /// Seconds spent in HAPPY after each turn
    pub cooldown_period: f32,
    pub startup_expression: Expression,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            cooldown_period: 1.0,
            startup_expression: Expression::Neutral,
        }
    }
}

impl MainConfig {
    /// Cooldown as a duration; negative or non-finite values become zero
    pub fn cooldown(&self) -> Duration {
        Duration::try_from_secs_f32(self.cooldown_period).unwrap_or(Duration::ZERO)
    }
}

/// Complete robot configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub display: DisplayConfig,
    pub servos: ServoConfig,
    pub audio: AudioConfig,
    pub llm: LlmConfig,
    pub main: MainConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: RobotConfig = toml::from_str(
            r#"
            [display.spi]
            rotation = 3

            [main]
            startup_expression = "happy"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.spi.rotation, 3);
        assert_eq!(config.display.spi.dc_pin, 24);
        assert_eq!(config.display.resolution.width, 480);
        assert_eq!(config.main.startup_expression, Expression::Happy);
        assert_eq!(config.servos.angles.neutral, 90);
        assert_eq!(config.llm.temperature, 0.7);
    }

    #[test]
    fn test_unknown_expression_rejected() {
        let result: Result<RobotConfig, _> = toml::from_str(
            r#"
            [main]
            startup_expression = "grumpy"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_cooldown_duration() {
        let mut main = MainConfig::default();
        assert_eq!(main.cooldown(), Duration::from_secs(1));

        main.cooldown_period = -2.0;
        assert_eq!(main.cooldown(), Duration::ZERO);
    }
}
