//! Core types and traits for mixed-language narration
//!
//! This crate provides the foundational types used across all other crates:
//! - Language tags and the recognized language set
//! - Word groups, segments, audio chunks and detection traces
//! - Error types
//! - Capability traits for language detection and speech synthesis

pub mod error;
pub mod language;
pub mod segment;
pub mod traits;

pub use error::{Error, Result};
pub use language::LanguageTag;
pub use segment::{AudioChunk, DetectionTrace, Segment, WordGroup};
pub use traits::{LanguageDetector, SpeechSynthesizer};
