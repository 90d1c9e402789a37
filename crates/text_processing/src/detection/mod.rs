//! Language detection over short word groups
//!
//! Short spans are noisy for language identification, so detection is two
//! staged: a probabilistic classifier may settle the question outright for
//! a priority language, otherwise a single-label classifier gets a vote
//! restricted to the allowed set.

mod classifiers;
mod detect;

pub use classifiers::{LinguaClassifier, WhatlangClassifier};
pub use detect::PriorityLanguageDetector;

use polyvoice_config::DetectionConfig;
use polyvoice_core::{LanguageDetector, LanguageTag};
use std::sync::Arc;

use crate::Result;

/// Scores text against many languages at once
pub trait ProbabilisticClassifier: Send + Sync {
    /// (ISO 639-1 code, confidence in [0, 1]) pairs
    fn confidences(&self, text: &str) -> Result<Vec<(String, f64)>>;

    fn name(&self) -> &'static str;
}

/// Returns a single best guess
pub trait LabelClassifier: Send + Sync {
    /// ISO 639-1 code of the best guess, `None` when undecided
    fn classify(&self, text: &str) -> Result<Option<String>>;

    fn name(&self) -> &'static str;
}

/// Create the production detector (lingua first, whatlang as fallback).
///
/// Both classifiers only consider the configured languages.
pub fn create_detector(config: &DetectionConfig) -> Arc<dyn LanguageDetector> {
    let mut candidates: Vec<LanguageTag> = config
        .priority_languages
        .iter()
        .chain(&config.allowed_languages)
        .copied()
        .filter(LanguageTag::is_known)
        .collect();
    candidates.sort();
    candidates.dedup();

    let primary = match LinguaClassifier::for_tags(&candidates) {
        Ok(classifier) => classifier,
        Err(e) => {
            tracing::warn!(languages = ?candidates, error = %e, "Falling back to lingua over all languages");
            LinguaClassifier::new()
        }
    };

    tracing::info!(
        languages = ?candidates,
        priority = ?config.priority_languages,
        threshold = config.confidence_threshold,
        "Using lingua detector with whatlang fallback"
    );
    Arc::new(PriorityLanguageDetector::from_config(
        Arc::new(primary),
        Arc::new(WhatlangClassifier::for_tags(&config.allowed_languages)),
        config,
    ))
}
