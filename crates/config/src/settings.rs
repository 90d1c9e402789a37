//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pipeline::{default_lessons, validate_detection, validate_lessons};
use crate::{ConfigError, DetectionConfig, LessonConfig, SegmentationConfig, SynthesisConfig};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Word grouping
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Language detection
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Speech engines
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Lesson modes, keyed by name
    #[serde(default = "default_lessons")]
    pub lessons: BTreeMap<String, LessonConfig>,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            segmentation: SegmentationConfig::default(),
            detection: DetectionConfig::default(),
            synthesis: SynthesisConfig::default(),
            lessons: default_lessons(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segmentation.group_size == 0 {
            return Err(ConfigError::invalid(
                "segmentation.group_size",
                "must be at least 1",
            ));
        }

        if self.synthesis.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "synthesis.request_timeout_secs",
                "must be at least 1",
            ));
        }

        if self.synthesis.max_concurrent_segments == Some(0) {
            return Err(ConfigError::invalid(
                "synthesis.max_concurrent_segments",
                "must be at least 1 when set",
            ));
        }

        if !self.synthesis.unknown_fallback_language.is_known() {
            return Err(ConfigError::invalid(
                "synthesis.unknown_fallback_language",
                "must be a recognized language",
            ));
        }

        validate_detection(&self.detection)?;
        validate_lessons(&self.lessons)?;

        if self.server.cors_enabled && self.server.cors_origins.is_empty() {
            tracing::debug!("CORS enabled with no explicit origins, allowing any origin");
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (any origin when empty)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (POLYVOICE_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(
            File::with_name(&format!("config/{}", env_name)).required(false),
        );
    }

    builder = builder.add_source(
        Environment::with_prefix("POLYVOICE")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("detection.priority_languages")
            .with_list_parse_key("detection.allowed_languages")
            .with_list_parse_key("server.cors_origins"),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
