//! Segmentation and audio types
//!
//! Text flows through the service as word groups, then language-tagged
//! segments, then audio chunks that carry their original segment index.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::LanguageTag;

/// A fixed-size run of consecutive words, the unit of language detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordGroup {
    /// Position of this group in the input
    pub index: usize,
    /// Words joined by single spaces
    pub text: String,
}

impl WordGroup {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Number of words in the group
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A maximal run of word groups that share one language tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Language of every group in this segment
    pub language: LanguageTag,
    /// Group texts joined by single spaces
    pub text: String,
}

impl Segment {
    pub fn new(language: LanguageTag, text: impl Into<String>) -> Self {
        Self {
            language,
            text: text.into(),
        }
    }
}

/// Synthesized audio for exactly one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    /// Index of the segment this audio belongs to
    pub index: usize,
    /// Language the segment was tagged with
    pub language: LanguageTag,
    /// Encoded audio (empty when synthesis was skipped or failed)
    pub audio: Bytes,
}

impl AudioChunk {
    pub fn new(index: usize, language: LanguageTag, audio: Bytes) -> Self {
        Self {
            index,
            language,
            audio,
        }
    }

    /// A zero-length chunk holding a segment's place
    pub fn empty(index: usize, language: LanguageTag) -> Self {
        Self::new(index, language, Bytes::new())
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}

/// Per-group detection results, kept for diagnostics only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionTrace {
    entries: Vec<(String, LanguageTag)>,
}

impl DetectionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tag detected for a group
    pub fn record(&mut self, group: impl Into<String>, language: LanguageTag) {
        self.entries.push((group.into(), language));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LanguageTag)> {
        self.entries.iter().map(|(text, tag)| (text.as_str(), *tag))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
