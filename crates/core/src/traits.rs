//! Capability traits
//!
//! The segmenter and the audio pipeline only see these traits, so the
//! statistical classifiers and the speech engines can be swapped or mocked
//! without touching either.

use async_trait::async_trait;
use bytes::Bytes;

use crate::{LanguageTag, Result};

/// Assigns a language tag to a short span of text.
///
/// Implementations must never fail: anything they cannot decide is
/// reported as [`LanguageTag::Unknown`].
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> LanguageTag;
}

/// Turns a language-tagged span of text into a complete audio buffer
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` in `language`, returning fully materialized audio
    async fn synthesize(&self, language: LanguageTag, text: &str) -> Result<Bytes>;

    /// Name used in logs
    fn name(&self) -> &str;
}
