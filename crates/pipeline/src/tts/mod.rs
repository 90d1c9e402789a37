//! Text-to-Speech backends
//!
//! Features:
//! - Microsoft Edge neural voices (English)
//! - Google Translate TTS (German, Russian, Turkish)
//! - Request-sized chunking for engines with short input limits
//! - Per-language registry implementing the core synthesizer trait

mod chunker;
mod edge;
mod google;
mod registry;

pub use chunker::{ChunkerConfig, RequestChunker};
pub use edge::EdgeTtsBackend;
pub use google::GoogleTtsBackend;
pub use registry::SegmentSynthesizer;

use bytes::Bytes;
use polyvoice_core::LanguageTag;

use crate::PipelineError;

/// TTS backend trait
#[async_trait::async_trait]
pub trait TtsBackend: Send + Sync {
    /// Synthesize text to complete encoded audio
    async fn synthesize(&self, text: &str, language: LanguageTag) -> Result<Bytes, PipelineError>;

    /// Engine name for logs
    fn name(&self) -> &str;
}
