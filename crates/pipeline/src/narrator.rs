//! Narrator
//!
//! Entry point used by the server: segments text, validates lessons, and
//! hands segments to the right pipeline.

use polyvoice_config::Settings;
use polyvoice_core::{DetectionTrace, LanguageDetector, SpeechSynthesizer};
use polyvoice_text_processing::{create_detector, Segmentation, Segmenter};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::lesson::{LessonError, LessonMode};
use crate::orchestrator::{AudioPipeline, AudioStream};
use crate::tts::SegmentSynthesizer;
use crate::PipelineError;

/// Narration request errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NarrationError {
    #[error("No text provided")]
    EmptyText,

    #[error("No valid language segments detected")]
    NoSegments,

    #[error("Unknown lesson: {0}")]
    UnknownLesson(String),

    #[error(transparent)]
    Lesson(#[from] LessonError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Audio plus the detection trace that produced it
pub struct Narration {
    pub trace: DetectionTrace,
    pub audio: AudioStream,
}

impl std::fmt::Debug for Narration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narration")
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

/// Segments text and streams it through the general or a lesson pipeline
#[derive(Clone)]
pub struct Narrator {
    segmenter: Segmenter,
    pipeline: AudioPipeline,
    lessons: Arc<BTreeMap<String, LessonMode>>,
}

impl Narrator {
    /// Production narrator: lingua/whatlang detection, Edge and Google engines
    pub fn from_settings(settings: &Settings) -> Result<Self, PipelineError> {
        let detector = create_detector(&settings.detection);
        let synthesizer: Arc<dyn SpeechSynthesizer> =
            Arc::new(SegmentSynthesizer::from_config(&settings.synthesis)?);
        Ok(Self::with_components(settings, detector, synthesizer))
    }

    /// Narrator over caller-supplied detector and synthesizer
    pub fn with_components(
        settings: &Settings,
        detector: Arc<dyn LanguageDetector>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let lessons = settings
            .lessons
            .iter()
            .map(|(name, config)| (name.clone(), LessonMode::from_config(name.clone(), config)))
            .collect();

        Self {
            segmenter: Segmenter::new(detector, settings.segmentation.group_size),
            pipeline: AudioPipeline::from_config(synthesizer, &settings.synthesis),
            lessons: Arc::new(lessons),
        }
    }

    /// Configured lesson names, sorted
    pub fn lesson_names(&self) -> impl Iterator<Item = &str> {
        self.lessons.keys().map(String::as_str)
    }

    pub fn lesson_mode(&self, name: &str) -> Option<&LessonMode> {
        self.lessons.get(name)
    }

    /// Speak every segment of `text` through the concurrent pipeline
    pub async fn narrate(&self, text: &str) -> Result<Narration, NarrationError> {
        let segmentation = self.segment(text).await?;
        if segmentation.is_empty() {
            return Err(NarrationError::NoSegments);
        }

        metrics::histogram!("polyvoice_segments_per_request").record(segmentation.segments.len() as f64);
        tracing::info!(
            segments = segmentation.segments.len(),
            languages = ?segmentation.languages(),
            "Narrating text"
        );

        let Segmentation { segments, trace } = segmentation;
        Ok(Narration {
            trace,
            audio: self.pipeline.run(segments),
        })
    }

    /// Speak `text` through the named lesson
    pub async fn lesson(&self, name: &str, text: &str) -> Result<Narration, NarrationError> {
        let lesson = self
            .lessons
            .get(name)
            .ok_or_else(|| NarrationError::UnknownLesson(name.to_string()))?;

        let segmentation = self.segment(text).await?;
        if let Err(e) = lesson.validate(&segmentation) {
            metrics::counter!("polyvoice_lesson_rejections_total", "lesson" => lesson.name().to_string())
                .increment(1);
            tracing::info!(lesson = lesson.name(), languages = ?segmentation.languages(), "Lesson rejected");
            return Err(e.into());
        }

        let Segmentation { segments, trace } = segmentation;
        Ok(Narration {
            trace,
            audio: lesson.stream(segments, Arc::clone(self.pipeline.synthesizer())),
        })
    }

    /// Segment on a blocking thread; the classifiers are CPU bound
    async fn segment(&self, text: &str) -> Result<Segmentation, NarrationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(NarrationError::EmptyText);
        }

        let segmenter = self.segmenter.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || segmenter.segment(&text))
            .await
            .map_err(|e| NarrationError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::StreamExt;
    use polyvoice_core::{Error, LanguageTag, Result};

    /// German when the group holds "guten", Turkish for "merhaba", else English
    struct StubDetector;

    impl LanguageDetector for StubDetector {
        fn detect(&self, text: &str) -> LanguageTag {
            if text.contains("guten") {
                LanguageTag::German
            } else if text.contains("merhaba") {
                LanguageTag::Turkish
            } else {
                LanguageTag::English
            }
        }
    }

    struct Echo;

    #[async_trait]
    impl SpeechSynthesizer for Echo {
        async fn synthesize(&self, language: LanguageTag, text: &str) -> Result<Bytes> {
            if text.contains("boom") {
                return Err(Error::synthesis(language, "stub failure"));
            }
            Ok(Bytes::from(format!("{}|", language)))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn narrator() -> Narrator {
        let mut settings = Settings::default();
        settings.segmentation.group_size = 2;
        Narrator::with_components(&settings, Arc::new(StubDetector), Arc::new(Echo))
    }

    async fn body(narration: Narration) -> String {
        let parts: Vec<Bytes> = narration.audio.collect().await;
        parts.iter().map(|b| String::from_utf8_lossy(b).into_owned()).collect()
    }

    #[tokio::test]
    async fn test_narrate_mixed_text() {
        let narration = narrator()
            .narrate("hello there guten tag merhaba dunya")
            .await
            .unwrap();
        assert_eq!(narration.trace.len(), 3);
        assert_eq!(body(narration).await, "en|de|tr|");
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        for text in ["", "   ", "\n\t"] {
            let err = narrator().narrate(text).await.unwrap_err();
            assert_eq!(err, NarrationError::EmptyText);
            assert_eq!(err.to_string(), "No text provided");
        }
    }

    #[tokio::test]
    async fn test_failed_segment_is_silent() {
        let narration = narrator().narrate("hello boom guten tag ok then").await.unwrap();
        assert_eq!(body(narration).await, "de|en|");
    }

    #[tokio::test]
    async fn test_lesson_requires_pair() {
        let err = narrator().lesson("german", "merhaba dunya").await.unwrap_err();
        assert_eq!(err.to_string(), "German lesson requires both English and German");
    }

    #[tokio::test]
    async fn test_lesson_skips_other_languages() {
        let narration = narrator()
            .lesson("german", "hello there merhaba dunya guten tag")
            .await
            .unwrap();
        assert_eq!(body(narration).await, "en|de|");
    }

    #[tokio::test]
    async fn test_unknown_lesson() {
        let err = narrator().lesson("klingon", "hello guten").await.unwrap_err();
        assert_eq!(err, NarrationError::UnknownLesson("klingon".to_string()));
    }

    #[test]
    fn test_lesson_names() {
        let n = narrator();
        assert_eq!(n.lesson_names().collect::<Vec<_>>(), vec!["german", "russian"]);
        assert_eq!(
            n.lesson_mode("russian").map(LessonMode::languages),
            Some((LanguageTag::English, LanguageTag::Russian))
        );
    }
}
