//! Per-language engine registry

use async_trait::async_trait;
use bytes::Bytes;
use polyvoice_config::SynthesisConfig;
use polyvoice_core::{Error, LanguageTag, Result, SpeechSynthesizer};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{EdgeTtsBackend, GoogleTtsBackend, TtsBackend};
use crate::PipelineError;

/// Routes each language to the backend that speaks it
#[derive(Clone, Default)]
pub struct SegmentSynthesizer {
    routes: HashMap<LanguageTag, Arc<dyn TtsBackend>>,
}

impl SegmentSynthesizer {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `backend` for `language`, replacing any previous route
    pub fn with_route(mut self, language: LanguageTag, backend: Arc<dyn TtsBackend>) -> Self {
        self.routes.insert(language, backend);
        self
    }

    /// Production registry: Edge neural voice for English, Google for the rest
    pub fn from_config(config: &SynthesisConfig) -> std::result::Result<Self, PipelineError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let english: Arc<dyn TtsBackend> = Arc::new(EdgeTtsBackend::new(
            config.english_voice.clone(),
            config.english_rate,
            config.edge_audio_format.clone(),
            timeout,
        ));
        let multilingual: Arc<dyn TtsBackend> =
            Arc::new(GoogleTtsBackend::new(&config.google_tld, timeout)?);

        tracing::info!(
            voice = %config.english_voice,
            rate = config.english_rate,
            "Using Edge TTS for English, Google TTS for other languages"
        );

        Ok(Self::new()
            .with_route(LanguageTag::English, english)
            .with_route(LanguageTag::German, Arc::clone(&multilingual))
            .with_route(LanguageTag::Russian, Arc::clone(&multilingual))
            .with_route(LanguageTag::Turkish, multilingual))
    }

    pub fn backend_for(&self, language: LanguageTag) -> Option<&Arc<dyn TtsBackend>> {
        self.routes.get(&language)
    }

    /// Languages with a registered backend, sorted
    pub fn languages(&self) -> Vec<LanguageTag> {
        let mut languages: Vec<_> = self.routes.keys().copied().collect();
        languages.sort();
        languages
    }
}

#[async_trait]
impl SpeechSynthesizer for SegmentSynthesizer {
    async fn synthesize(&self, language: LanguageTag, text: &str) -> Result<Bytes> {
        let backend = self
            .routes
            .get(&language)
            .ok_or(Error::UnsupportedLanguage(language))?;

        tracing::debug!(language = %language, engine = backend.name(), "Synthesizing segment");

        backend
            .synthesize(text, language)
            .await
            .map_err(|e| Error::synthesis(language, e.to_string()))
    }

    fn name(&self) -> &str {
        "registry"
    }
}
