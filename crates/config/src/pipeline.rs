//! Narration pipeline configuration

use polyvoice_core::LanguageTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ConfigError;

/// Word grouping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Words per detection group
    #[serde(default = "default_group_size")]
    pub group_size: usize,
}

fn default_group_size() -> usize {
    4
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
        }
    }
}

/// Language detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Languages accepted from the probabilistic classifier, highest rank first
    #[serde(default = "default_languages")]
    pub priority_languages: Vec<LanguageTag>,

    /// Languages accepted from the fallback classifier
    #[serde(default = "default_languages")]
    pub allowed_languages: Vec<LanguageTag>,

    /// A priority language must score strictly above this to win outright
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

fn default_languages() -> Vec<LanguageTag> {
    LanguageTag::RECOGNIZED.to_vec()
}

fn default_confidence_threshold() -> f64 {
    0.8
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            priority_languages: default_languages(),
            allowed_languages: default_languages(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

/// What to do with segments tagged `unknown` in the general pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    /// Produce no audio for the segment
    #[default]
    Skip,
    /// Synthesize it as `unknown_fallback_language`
    Fallback,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Edge neural voice used for English
    #[serde(default = "default_english_voice")]
    pub english_voice: String,

    /// English speaking rate, percent relative to the voice default
    #[serde(default = "default_english_rate")]
    pub english_rate: i32,

    /// Edge output format
    #[serde(default = "default_edge_audio_format")]
    pub edge_audio_format: String,

    /// Top-level domain of the Google Translate TTS host
    #[serde(default = "default_google_tld")]
    pub google_tld: String,

    /// Per-request timeout for engine calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Policy for `unknown` segments
    #[serde(default)]
    pub unknown_policy: UnknownPolicy,

    /// Language used when `unknown_policy` is `fallback`
    #[serde(default = "default_fallback_language")]
    pub unknown_fallback_language: LanguageTag,

    /// Cap on in-flight segment syntheses per request (unbounded when absent)
    #[serde(default)]
    pub max_concurrent_segments: Option<usize>,
}

fn default_english_voice() -> String {
    "en-US-GuyNeural".to_string()
}
fn default_english_rate() -> i32 {
    -10
}
fn default_edge_audio_format() -> String {
    "audio-24khz-48kbitrate-mono-mp3".to_string()
}
fn default_google_tld() -> String {
    "com".to_string()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_fallback_language() -> LanguageTag {
    LanguageTag::English
}

impl SynthesisConfig {
    /// Language `unknown` segments are routed to, if any
    pub fn unknown_fallback(&self) -> Option<LanguageTag> {
        match self.unknown_policy {
            UnknownPolicy::Skip => None,
            UnknownPolicy::Fallback => Some(self.unknown_fallback_language),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            english_voice: default_english_voice(),
            english_rate: default_english_rate(),
            edge_audio_format: default_edge_audio_format(),
            google_tld: default_google_tld(),
            request_timeout_secs: default_request_timeout(),
            unknown_policy: UnknownPolicy::default(),
            unknown_fallback_language: default_fallback_language(),
            max_concurrent_segments: None,
        }
    }
}

/// A lesson mode: both languages must appear before anything is spoken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonConfig {
    /// Language the lesson is taught in
    pub primary: LanguageTag,
    /// Language being taught
    pub target: LanguageTag,
}

impl LessonConfig {
    pub fn new(primary: LanguageTag, target: LanguageTag) -> Self {
        Self { primary, target }
    }
}

/// Built-in lessons, keyed by the name used in `/tts_{name}_lesson`
pub fn default_lessons() -> BTreeMap<String, LessonConfig> {
    let mut lessons = BTreeMap::new();
    lessons.insert(
        "german".to_string(),
        LessonConfig::new(LanguageTag::English, LanguageTag::German),
    );
    lessons.insert(
        "russian".to_string(),
        LessonConfig::new(LanguageTag::English, LanguageTag::Russian),
    );
    lessons
}

pub(crate) fn validate_detection(config: &DetectionConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.confidence_threshold) {
        return Err(ConfigError::invalid(
            "detection.confidence_threshold",
            format!("must be within [0, 1], got {}", config.confidence_threshold),
        ));
    }

    for (field, languages) in [
        ("detection.priority_languages", &config.priority_languages),
        ("detection.allowed_languages", &config.allowed_languages),
    ] {
        if languages.contains(&LanguageTag::Unknown) {
            return Err(ConfigError::invalid(field, "may not contain 'unknown'"));
        }
    }

    Ok(())
}

pub(crate) fn validate_lessons(lessons: &BTreeMap<String, LessonConfig>) -> Result<(), ConfigError> {
    for (name, lesson) in lessons {
        let field = format!("lessons.{}", name);
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::invalid(field, "lesson names must be alphanumeric"));
        }
        if !lesson.primary.is_known() || !lesson.target.is_known() {
            return Err(ConfigError::invalid(field, "lessons need two recognized languages"));
        }
        if lesson.primary == lesson.target {
            return Err(ConfigError::invalid(field, "lesson languages must differ"));
        }
    }
    Ok(())
}
