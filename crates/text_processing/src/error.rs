//! Error types for text processing

use thiserror::Error;

/// Text processing errors
#[derive(Debug, Error)]
pub enum TextProcessingError {
    /// A classifier could not score the text
    #[error("Classifier '{classifier}' failed: {message}")]
    Classifier {
        classifier: &'static str,
        message: String,
    },

    /// The text carries no usable signal (digits, punctuation, ...)
    #[error("Language undetermined for '{0}'")]
    Undetermined(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for text processing
pub type Result<T> = std::result::Result<T, TextProcessingError>;
