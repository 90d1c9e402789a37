//! Error types for the narration service

use thiserror::Error;

use crate::LanguageTag;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type shared by detection and synthesis components
#[derive(Error, Debug)]
pub enum Error {
    /// A speech engine failed to produce audio
    #[error("Synthesis error ({language}): {message}")]
    Synthesis {
        language: LanguageTag,
        message: String,
    },

    /// No engine is registered for the language
    #[error("No synthesis engine registered for language '{0}'")]
    UnsupportedLanguage(LanguageTag),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a synthesis error for a language
    pub fn synthesis(language: LanguageTag, message: impl Into<String>) -> Self {
        Self::Synthesis {
            language,
            message: message.into(),
        }
    }
}
