//! Multi-language speech synthesis pipeline
//!
//! This crate turns language-tagged segments into one ordered audio stream:
//! - TTS backends (Edge neural voices, Google Translate TTS)
//! - Per-language engine registry
//! - Concurrent fan-out with ordered reassembly
//! - Lesson modes that require a language pair before speaking
//! - A narrator facade tying segmentation and synthesis together

pub mod lesson;
pub mod narrator;
pub mod orchestrator;
pub mod tts;

pub use lesson::{LessonError, LessonMode};
pub use narrator::{Narration, NarrationError, Narrator};
pub use orchestrator::{AudioPipeline, AudioStream};
pub use tts::{EdgeTtsBackend, GoogleTtsBackend, SegmentSynthesizer, TtsBackend};

use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    #[error("TTS error: {0}")]
    Tts(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PipelineError::Http(format!("request timed out: {}", err))
        } else {
            PipelineError::Http(err.to_string())
        }
    }
}

impl From<PipelineError> for polyvoice_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Config(message) => polyvoice_core::Error::Config(message),
            other => polyvoice_core::Error::Other(other.to_string()),
        }
    }
}
