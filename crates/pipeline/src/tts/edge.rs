//! Microsoft Edge "Read aloud" neural voices

use bytes::Bytes;
use msedge_tts::tts::{client::connect_async, SpeechConfig};
use polyvoice_core::LanguageTag;
use std::time::Duration;

use super::TtsBackend;
use crate::PipelineError;

/// Neural voice engine with a fixed voice and speaking rate.
///
/// Each request opens its own websocket; the connection is closed when the
/// request finishes or its timeout drops the future.
#[derive(Debug, Clone)]
pub struct EdgeTtsBackend {
    voice: String,
    rate: i32,
    audio_format: String,
    timeout: Duration,
}

impl EdgeTtsBackend {
    /// `rate` is a percentage relative to the voice default (-10 = 10% slower)
    pub fn new(voice: impl Into<String>, rate: i32, audio_format: impl Into<String>, timeout: Duration) -> Self {
        Self {
            voice: voice.into(),
            rate,
            audio_format: audio_format.into(),
            timeout,
        }
    }

    fn speech_config(&self) -> SpeechConfig {
        SpeechConfig {
            voice_name: self.voice.clone(),
            audio_format: self.audio_format.clone(),
            pitch: 0,
            rate: self.rate,
            volume: 0,
        }
    }
}

#[async_trait::async_trait]
impl TtsBackend for EdgeTtsBackend {
    async fn synthesize(&self, text: &str, _language: LanguageTag) -> Result<Bytes, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::Tts("no text to speak".to_string()));
        }

        let config = self.speech_config();
        let text = escape_ssml(text);

        let request = async move {
            let mut client = connect_async()
                .await
                .map_err(|e| PipelineError::Tts(format!("edge connect failed: {}", e)))?;
            let audio = client
                .synthesize(&text, &config)
                .await
                .map_err(|e| PipelineError::Tts(format!("edge synthesis failed: {}", e)))?;
            Ok::<_, PipelineError>(Bytes::from(audio.audio_bytes))
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(PipelineError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    fn name(&self) -> &str {
        "edge"
    }
}

/// Escape characters that would break the SSML document
fn escape_ssml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_config() {
        let backend = EdgeTtsBackend::new(
            "en-US-GuyNeural",
            -10,
            "audio-24khz-48kbitrate-mono-mp3",
            Duration::from_secs(5),
        );
        let config = backend.speech_config();
        assert_eq!(config.voice_name, "en-US-GuyNeural");
        assert_eq!(config.rate, -10);
        assert_eq!(config.pitch, 0);
    }

    #[test]
    fn test_escape_ssml() {
        assert_eq!(escape_ssml("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
        assert_eq!(escape_ssml("plain"), "plain");
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_without_network() {
        let backend = EdgeTtsBackend::new("en-US-GuyNeural", -10, "mp3", Duration::from_secs(1));
        let result = backend.synthesize("   ", LanguageTag::English).await;
        assert!(matches!(result, Err(PipelineError::Tts(_))));
    }

    #[tokio::test]
    async fn test_timeout_abandons_the_connection() {
        let backend = EdgeTtsBackend::new("en-US-GuyNeural", 0, "mp3", Duration::from_millis(1));
        let started = std::time::Instant::now();
        let result = backend.synthesize("Hello world", LanguageTag::English).await;

        assert!(matches!(result, Err(PipelineError::Timeout(1)) | Err(PipelineError::Tts(_))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
