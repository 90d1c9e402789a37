//! Concurrent Audio Pipeline
//!
//! Fans synthesis out to one task per segment, waits for every task, then
//! yields the audio in segment order. Nothing is emitted until the last
//! segment has finished, and completion order never affects output order.

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use polyvoice_config::SynthesisConfig;
use polyvoice_core::{AudioChunk, LanguageTag, Segment, SpeechSynthesizer};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Ordered audio output. Finite and not restartable.
pub type AudioStream = BoxStream<'static, Bytes>;

/// Fan-out/join synthesis over a list of segments
#[derive(Clone)]
pub struct AudioPipeline {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    unknown_fallback: Option<LanguageTag>,
    max_concurrent: Option<usize>,
}

impl AudioPipeline {
    /// Pipeline that skips `unknown` segments and runs one task per segment
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            synthesizer,
            unknown_fallback: None,
            max_concurrent: None,
        }
    }

    pub fn from_config(synthesizer: Arc<dyn SpeechSynthesizer>, config: &SynthesisConfig) -> Self {
        Self::new(synthesizer)
            .with_unknown_fallback(config.unknown_fallback())
            .with_max_concurrent(config.max_concurrent_segments)
    }

    /// Route `unknown` segments to a language instead of skipping them
    pub fn with_unknown_fallback(mut self, fallback: Option<LanguageTag>) -> Self {
        self.unknown_fallback = fallback.filter(LanguageTag::is_known);
        self
    }

    /// Cap the number of in-flight syntheses
    pub fn with_max_concurrent(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent = limit.map(|n| n.max(1));
        self
    }

    pub fn synthesizer(&self) -> &Arc<dyn SpeechSynthesizer> {
        &self.synthesizer
    }

    /// Lazily synthesize `segments` and stream their audio in order.
    ///
    /// Work starts on the first poll; the first buffer is produced only
    /// after every segment has completed.
    pub fn run(&self, segments: Vec<Segment>) -> AudioStream {
        let pipeline = self.clone();
        stream::once(async move { pipeline.synthesize_all(segments).await })
            .flat_map(|chunks| stream::iter(chunks.into_iter().map(|chunk| chunk.audio)))
            .boxed()
    }

    /// Synthesize every segment concurrently and return chunks in index order
    pub async fn synthesize_all(&self, segments: Vec<Segment>) -> Vec<AudioChunk> {
        let started = Instant::now();
        let total = segments.len();
        let limiter = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n)));

        let handles: Vec<_> = segments
            .into_iter()
            .enumerate()
            .map(|(index, segment)| {
                let synthesizer = Arc::clone(&self.synthesizer);
                let limiter = limiter.clone();
                let fallback = self.unknown_fallback;
                let language = segment.language;
                let handle = tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    let target = match (segment.language, fallback) {
                        (LanguageTag::Unknown, None) => {
                            tracing::debug!(index, "Skipping segment with unknown language");
                            return AudioChunk::empty(index, segment.language);
                        }
                        (LanguageTag::Unknown, Some(fallback)) => fallback,
                        (language, _) => language,
                    };
                    let audio = synthesize_or_silence(synthesizer.as_ref(), index, target, &segment.text).await;
                    AudioChunk::new(index, segment.language, audio)
                });
                (index, language, handle)
            })
            .collect();

        // Join barrier; each result lands in the slot of its own index
        let mut chunks = Vec::with_capacity(total);
        for (index, language, handle) in handles {
            match handle.await {
                Ok(chunk) => chunks.push(chunk),
                Err(e) => {
                    tracing::error!(index, error = %e, "Segment worker failed");
                    metrics::counter!("polyvoice_synthesis_errors_total", "language" => language.code())
                        .increment(1);
                    chunks.push(AudioChunk::empty(index, language));
                }
            }
        }
        debug_assert!(chunks.iter().enumerate().all(|(i, c)| c.index == i));

        let failed = chunks.iter().filter(|c| c.is_empty()).count();
        tracing::info!(
            segments = total,
            silent = failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Synthesized all segments"
        );

        chunks
    }
}

/// Synthesize one segment, logging failures and returning empty audio for them
pub(crate) async fn synthesize_or_silence(
    synthesizer: &dyn SpeechSynthesizer,
    index: usize,
    language: LanguageTag,
    text: &str,
) -> Bytes {
    let started = Instant::now();
    match synthesizer.synthesize(language, text).await {
        Ok(audio) => {
            let elapsed = started.elapsed();
            metrics::histogram!("polyvoice_segment_synthesis_seconds", "language" => language.code())
                .record(elapsed.as_secs_f64());
            tracing::debug!(
                index,
                language = %language,
                bytes = audio.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Segment synthesized"
            );
            audio
        }
        Err(e) => {
            metrics::counter!("polyvoice_synthesis_errors_total", "language" => language.code())
                .increment(1);
            tracing::warn!(index, language = %language, error = %e, "Segment error");
            Bytes::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use polyvoice_core::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Echoes its input after a delay that shrinks with the text's first digit
    struct Delayed {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl Delayed {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for Delayed {
        async fn synthesize(&self, language: LanguageTag, text: &str) -> Result<Bytes> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay: u64 = text.split(':').next().and_then(|d| d.parse().ok()).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if text.contains("fail") {
                return Err(Error::synthesis(language, "engine exploded"));
            }
            Ok(Bytes::from(format!("[{}:{}]", language, text)))
        }

        fn name(&self) -> &str {
            "delayed"
        }
    }

    fn segments(specs: &[(LanguageTag, &str)]) -> Vec<Segment> {
        specs.iter().map(|(l, t)| Segment::new(*l, *t)).collect()
    }

    async fn collect(stream: AudioStream) -> Vec<Bytes> {
        stream.collect().await
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_order_ignores_completion_order() {
        // Later segments finish first
        let pipeline = AudioPipeline::new(Arc::new(Delayed::new()));
        let input = segments(&[
            (LanguageTag::English, "50:a"),
            (LanguageTag::German, "40:b"),
            (LanguageTag::Russian, "5:c"),
            (LanguageTag::Turkish, "0:d"),
            (LanguageTag::English, "25:e"),
        ]);

        let output = collect(pipeline.run(input)).await;
        let text: Vec<_> = output.iter().map(|b| String::from_utf8(b.to_vec()).unwrap()).collect();
        assert_eq!(
            text,
            vec!["[en:50:a]", "[de:40:b]", "[ru:5:c]", "[tr:0:d]", "[en:25:e]"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_segments_run_concurrently() {
        let synth = Arc::new(Delayed::new());
        let pipeline = AudioPipeline::new(synth.clone());
        let input = segments(&[
            (LanguageTag::English, "30:a"),
            (LanguageTag::German, "30:b"),
            (LanguageTag::Russian, "30:c"),
        ]);

        let chunks = pipeline.synthesize_all(input).await;
        assert_eq!(chunks.len(), 3);
        assert_eq!(synth.peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_cap() {
        let synth = Arc::new(Delayed::new());
        let pipeline = AudioPipeline::new(synth.clone()).with_max_concurrent(Some(2));
        let input = segments(&[
            (LanguageTag::English, "10:a"),
            (LanguageTag::German, "10:b"),
            (LanguageTag::Russian, "10:c"),
            (LanguageTag::Turkish, "10:d"),
        ]);

        let chunks = pipeline.synthesize_all(input).await;
        assert_eq!(chunks.len(), 4);
        assert_eq!(synth.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_segment_keeps_its_slot() {
        let pipeline = AudioPipeline::new(Arc::new(Delayed::new()));
        let input = segments(&[
            (LanguageTag::English, "1:one"),
            (LanguageTag::German, "0:fail"),
            (LanguageTag::English, "2:three"),
        ]);

        let chunks = pipeline.synthesize_all(input).await;
        assert_eq!(chunks.len(), 3);
        assert!(chunks[1].is_empty());
        assert_eq!(chunks[1].language, LanguageTag::German);
        assert_eq!(&chunks[2].audio[..], b"[en:2:three]");
    }

    #[tokio::test]
    async fn test_unknown_segments_skipped_by_default() {
        let pipeline = AudioPipeline::new(Arc::new(Delayed::new()));
        let input = segments(&[(LanguageTag::Unknown, "0:123"), (LanguageTag::English, "0:hi")]);

        let output = collect(pipeline.run(input)).await;
        assert_eq!(output.len(), 2);
        assert!(output[0].is_empty());
        assert_eq!(&output[1][..], b"[en:0:hi]");
    }

    #[tokio::test]
    async fn test_unknown_fallback() {
        let pipeline = AudioPipeline::new(Arc::new(Delayed::new()))
            .with_unknown_fallback(Some(LanguageTag::German));
        let input = segments(&[(LanguageTag::Unknown, "0:xyz")]);

        let chunks = pipeline.synthesize_all(input).await;
        assert_eq!(chunks[0].language, LanguageTag::Unknown);
        assert_eq!(&chunks[0].audio[..], b"[de:0:xyz]");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pipeline = AudioPipeline::new(Arc::new(Delayed::new()));
        assert!(collect(pipeline.run(Vec::new())).await.is_empty());
    }

    #[tokio::test]
    async fn test_nothing_runs_before_first_poll() {
        let synth = Arc::new(Delayed::new());
        let pipeline = AudioPipeline::new(synth.clone());
        let stream = pipeline.run(segments(&[(LanguageTag::English, "0:a")]));

        tokio::task::yield_now().await;
        assert_eq!(synth.peak.load(Ordering::SeqCst), 0);

        assert_eq!(collect(stream).await.len(), 1);
        assert_eq!(synth.peak.load(Ordering::SeqCst), 1);
    }
}
