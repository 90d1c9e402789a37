//! Google Translate TTS
//!
//! A multilingual engine parameterised only by language code. The endpoint
//! accepts short inputs, so longer segments are sent as several requests and
//! the returned MP3 pieces are concatenated.

use bytes::{Bytes, BytesMut};
use polyvoice_core::LanguageTag;
use std::time::Duration;

use super::{RequestChunker, TtsBackend};
use crate::PipelineError;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Google Translate TTS client
#[derive(Debug, Clone)]
pub struct GoogleTtsBackend {
    client: reqwest::Client,
    endpoint: String,
    chunker: RequestChunker,
}

impl GoogleTtsBackend {
    /// Create a client for `translate.google.{tld}`
    pub fn new(tld: &str, timeout: Duration) -> Result<Self, PipelineError> {
        Self::with_endpoint(format!("https://translate.google.{}/translate_tts", tld), timeout)
    }

    /// Create a client against an explicit endpoint URL
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            chunker: RequestChunker::default(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_piece(
        &self,
        piece: &str,
        language: LanguageTag,
        index: usize,
        total: usize,
    ) -> Result<Bytes, PipelineError> {
        let index = index.to_string();
        let total = total.to_string();
        let textlen = piece.chars().count().to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", piece),
                ("tl", language.code()),
                ("client", "tw-ob"),
                ("total", total.as_str()),
                ("idx", index.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?)
    }
}

#[async_trait::async_trait]
impl TtsBackend for GoogleTtsBackend {
    async fn synthesize(&self, text: &str, language: LanguageTag) -> Result<Bytes, PipelineError> {
        if !language.is_known() {
            return Err(PipelineError::Tts(format!(
                "language '{}' is not supported",
                language
            )));
        }

        let pieces = self.chunker.split(text);
        if pieces.is_empty() {
            return Err(PipelineError::Tts("no text to speak".to_string()));
        }

        let total = pieces.len();
        let mut audio = BytesMut::new();
        for (index, piece) in pieces.iter().enumerate() {
            let bytes = self.fetch_piece(piece, language, index, total).await?;
            tracing::trace!(
                language = %language,
                piece = index,
                total,
                bytes = bytes.len(),
                "Fetched Google TTS piece"
            );
            audio.extend_from_slice(&bytes);
        }

        Ok(audio.freeze())
    }

    fn name(&self) -> &str {
        "google"
    }
}
