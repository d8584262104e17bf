//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
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
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    /// Model used for scenario generation, questioning, and evaluation.
    pub interview_model: String,
    /// Model used for the sample-answer side-channel.
    pub sample_model: String,
    /// Whether the optional speech capabilities are wired up at all.
    pub voice_enabled: bool,
    pub stt_model: String,
    /// Sample rate of the raw PCM16 answer audio sent by the client.
    pub stt_sample_rate: u32,
    pub tts_voice: String,
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

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();

        let interview_model =
            std::env::var("INTERVIEW_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let sample_model =
            std::env::var("SAMPLE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let voice_enabled_str =
            std::env::var("VOICE_ENABLED").unwrap_or_else(|_| "false".to_string());
        let voice_enabled = voice_enabled_str.parse::<bool>().map_err(|_| {
            ConfigError::InvalidValue(
                "VOICE_ENABLED".to_string(),
                format!("'{}' is not a valid boolean", voice_enabled_str),
            )
        })?;

        let stt_model = std::env::var("STT_MODEL").unwrap_or_else(|_| "whisper-1".to_string());
        let stt_sample_rate_str =
            std::env::var("STT_SAMPLE_RATE").unwrap_or_else(|_| "16000".to_string());
        let stt_sample_rate = stt_sample_rate_str.parse::<u32>().map_err(|_| {
            ConfigError::InvalidValue(
                "STT_SAMPLE_RATE".to_string(),
                format!("'{}' is not a valid sample rate", stt_sample_rate_str),
            )
        })?;
        let tts_voice = std::env::var("TTS_VOICE").unwrap_or_else(|_| "alloy".to_string());

        Ok(Self {
            bind_address,
            log_level,
            openai_api_key,
            interview_model,
            sample_model,
            voice_enabled,
            stt_model,
            stt_sample_rate,
            tts_voice,
        })
    }
}
