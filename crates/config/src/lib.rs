//! Configuration management for the narration service
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables (POLYVOICE_ prefix, `__` separator)

pub mod pipeline;
pub mod settings;

pub use pipeline::{
    DetectionConfig, LessonConfig, SegmentationConfig, SynthesisConfig, UnknownPolicy,
};
pub use settings::{load_settings, ObservabilityConfig, ServerConfig, Settings};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
