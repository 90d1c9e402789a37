//! Priority-ranked language detector

use polyvoice_config::DetectionConfig;
use polyvoice_core::{LanguageDetector, LanguageTag};
use std::sync::Arc;

use super::{LabelClassifier, ProbabilisticClassifier};
use crate::Result;

/// Combines a probabilistic classifier and a fallback classifier.
///
/// Priority languages are tried in rank order and the first one scoring
/// strictly above the threshold wins. Otherwise the fallback's guess is used
/// when it is allowed, and `unknown` when it is not.
pub struct PriorityLanguageDetector {
    primary: Arc<dyn ProbabilisticClassifier>,
    fallback: Arc<dyn LabelClassifier>,
    priority: Vec<LanguageTag>,
    allowed: Vec<LanguageTag>,
    threshold: f64,
}

impl PriorityLanguageDetector {
    /// Create a detector with the default ranking (en, de, ru, tr) and threshold 0.8
    pub fn new(
        primary: Arc<dyn ProbabilisticClassifier>,
        fallback: Arc<dyn LabelClassifier>,
    ) -> Self {
        Self::from_config(primary, fallback, &DetectionConfig::default())
    }

    pub fn from_config(
        primary: Arc<dyn ProbabilisticClassifier>,
        fallback: Arc<dyn LabelClassifier>,
        config: &DetectionConfig,
    ) -> Self {
        Self {
            primary,
            fallback,
            priority: config.priority_languages.clone(),
            allowed: config.allowed_languages.clone(),
            threshold: config.confidence_threshold,
        }
    }

    fn try_detect(&self, text: &str) -> Result<LanguageTag> {
        let scores = self.primary.confidences(text)?;

        for language in &self.priority {
            let confident = scores.iter().any(|(code, confidence)| {
                LanguageTag::from_code(code) == Some(*language) && *confidence > self.threshold
            });
            if confident {
                return Ok(*language);
            }
        }

        let guess = self.fallback.classify(text)?;
        Ok(guess
            .as_deref()
            .and_then(LanguageTag::from_code)
            .filter(|language| self.allowed.contains(language))
            .unwrap_or(LanguageTag::Unknown))
    }
}

impl LanguageDetector for PriorityLanguageDetector {
    fn detect(&self, text: &str) -> LanguageTag {
        match self.try_detect(text) {
            Ok(language) => language,
            Err(e) => {
                tracing::debug!(text, error = %e, "Language detection failed, tagging as unknown");
                LanguageTag::Unknown
            }
        }
    }
}
