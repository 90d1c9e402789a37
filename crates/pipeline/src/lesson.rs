//! Lesson modes
//!
//! A lesson pairs the language it is taught in with the language being
//! taught. Text is only spoken when both appear, and only segments in one of
//! the two languages are spoken, one after another.

use futures::stream::{self, StreamExt};
use polyvoice_config::LessonConfig;
use polyvoice_core::{LanguageTag, Segment, SpeechSynthesizer};
use polyvoice_text_processing::{Segmentation, Segmenter};
use std::sync::Arc;
use thiserror::Error;

use crate::orchestrator::{synthesize_or_silence, AudioStream};

/// Lesson validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LessonError {
    #[error("{lesson} lesson requires both {primary} and {target}")]
    MissingLanguages {
        lesson: String,
        primary: &'static str,
        target: &'static str,
    },
}

/// A named language-pair lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonMode {
    name: String,
    primary: LanguageTag,
    target: LanguageTag,
}

impl LessonMode {
    pub fn new(name: impl Into<String>, primary: LanguageTag, target: LanguageTag) -> Self {
        Self {
            name: name.into(),
            primary,
            target,
        }
    }

    pub fn from_config(name: impl Into<String>, config: &LessonConfig) -> Self {
        Self::new(name, config.primary, config.target)
    }

    /// English/German lesson
    pub fn german() -> Self {
        Self::new("german", LanguageTag::English, LanguageTag::German)
    }

    /// English/Russian lesson
    pub fn russian() -> Self {
        Self::new("russian", LanguageTag::English, LanguageTag::Russian)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capitalized name used in messages ("german" -> "German")
    pub fn title(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn languages(&self) -> (LanguageTag, LanguageTag) {
        (self.primary, self.target)
    }

    /// Does this lesson speak `language`?
    pub fn speaks(&self, language: LanguageTag) -> bool {
        language == self.primary || language == self.target
    }

    /// Reject segmentations missing either lesson language
    pub fn validate(&self, segmentation: &Segmentation) -> Result<(), LessonError> {
        let present = segmentation.languages();
        if present.contains(&self.primary) && present.contains(&self.target) {
            Ok(())
        } else {
            Err(LessonError::MissingLanguages {
                lesson: self.title(),
                primary: self.primary.display_name(),
                target: self.target.display_name(),
            })
        }
    }

    /// Speak the lesson's segments in order, one at a time.
    ///
    /// Segments in other languages (including `unknown`) are skipped.
    pub fn stream(&self, segments: Vec<Segment>, synthesizer: Arc<dyn SpeechSynthesizer>) -> AudioStream {
        let lesson = self.clone();
        stream::iter(segments.into_iter().enumerate())
            .filter(move |(_, segment)| futures::future::ready(lesson.speaks(segment.language)))
            .then(move |(index, segment)| {
                let synthesizer = Arc::clone(&synthesizer);
                async move {
                    synthesize_or_silence(synthesizer.as_ref(), index, segment.language, &segment.text).await
                }
            })
            .boxed()
    }

    /// Segment `text`, validate it, and stream the lesson audio
    pub fn validate_and_stream(
        &self,
        segmenter: &Segmenter,
        text: &str,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Result<AudioStream, LessonError> {
        let segmentation = segmenter.segment(text);
        self.validate(&segmentation)?;
        Ok(self.stream(segmentation.segments, synthesizer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use polyvoice_core::{LanguageDetector, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tags each word by a one-letter prefix: e/g/r/t, anything else unknown
    struct PrefixDetector;

    impl LanguageDetector for PrefixDetector {
        fn detect(&self, text: &str) -> LanguageTag {
            match text.chars().next() {
                Some('e') => LanguageTag::English,
                Some('g') => LanguageTag::German,
                Some('r') => LanguageTag::Russian,
                Some('t') => LanguageTag::Turkish,
                _ => LanguageTag::Unknown,
            }
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpeechSynthesizer for Counting {
        async fn synthesize(&self, language: LanguageTag, text: &str) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from(format!("<{}:{}>", language, text)))
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn segmenter() -> Segmenter {
        Segmenter::new(Arc::new(PrefixDetector), 1)
    }

    async fn speak(lesson: &LessonMode, text: &str) -> std::result::Result<(Vec<String>, usize), LessonError> {
        let synth = Arc::new(Counting::default());
        let stream = lesson.validate_and_stream(&segmenter(), text, synth.clone())?;
        let audio: Vec<String> = stream
            .map(|b| String::from_utf8(b.to_vec()).unwrap())
            .collect()
            .await;
        Ok((audio, synth.calls.load(Ordering::SeqCst)))
    }

    #[tokio::test]
    async fn test_rejects_missing_language() {
        let err = speak(&LessonMode::german(), "tbir tiki tuc").await.unwrap_err();
        assert_eq!(err.to_string(), "German lesson requires both English and German");

        let err = speak(&LessonMode::russian(), "ehello gguten").await.unwrap_err();
        assert_eq!(err.to_string(), "Russian lesson requires both English and Russian");
    }

    #[tokio::test]
    async fn test_rejection_synthesizes_nothing() {
        let synth = Arc::new(Counting::default());
        let result = LessonMode::german().validate_and_stream(&segmenter(), "eonly ewords", synth.clone());
        assert!(result.is_err());
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_does_not_satisfy_requirement() {
        assert!(speak(&LessonMode::german(), "ehello ?what").await.is_err());
    }

    #[tokio::test]
    async fn test_streams_only_lesson_languages_in_order() {
        let (audio, calls) = speak(&LessonMode::german(), "ehello tmerhaba gguten ?x ebye")
            .await
            .unwrap();
        assert_eq!(audio, vec!["<en:ehello>", "<de:gguten>", "<en:ebye>"]);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_accepts_extra_languages() {
        let (audio, _) = speak(&LessonMode::russian(), "rprivet tselam eand gtag")
            .await
            .unwrap();
        assert_eq!(audio, vec!["<ru:rprivet>", "<en:eand>"]);
    }

    #[test]
    fn test_title() {
        assert_eq!(LessonMode::german().title(), "German");
        assert_eq!(LessonMode::new("", LanguageTag::English, LanguageTag::German).title(), "");
    }
}
