//! Classifier adapters for lingua and whatlang

use lingua::{LanguageDetector, LanguageDetectorBuilder};
use polyvoice_core::LanguageTag;
use whatlang::{Detector, Lang};

use super::{LabelClassifier, ProbabilisticClassifier};
use crate::{Result, TextProcessingError};

/// lingua model for a recognized language
fn lingua_language(tag: LanguageTag) -> Option<lingua::Language> {
    match tag {
        LanguageTag::English => Some(lingua::Language::English),
        LanguageTag::German => Some(lingua::Language::German),
        LanguageTag::Russian => Some(lingua::Language::Russian),
        LanguageTag::Turkish => Some(lingua::Language::Turkish),
        LanguageTag::Unknown => None,
    }
}

/// whatlang code for a recognized language
fn whatlang_lang(tag: LanguageTag) -> Option<Lang> {
    match tag {
        LanguageTag::English => Some(Lang::Eng),
        LanguageTag::German => Some(Lang::Deu),
        LanguageTag::Russian => Some(Lang::Rus),
        LanguageTag::Turkish => Some(Lang::Tur),
        LanguageTag::Unknown => None,
    }
}

/// Probabilistic classifier backed by lingua.
///
/// Confidence is spread over the candidate languages only, so short word
/// groups need a small candidate set to score anywhere near the threshold.
/// Language models are loaded lazily on first use.
pub struct LinguaClassifier {
    detector: LanguageDetector,
}

impl LinguaClassifier {
    /// Classifier over every language lingua knows
    pub fn new() -> Self {
        Self {
            detector: LanguageDetectorBuilder::from_all_languages().build(),
        }
    }

    /// Classifier restricted to the given languages (at least two)
    pub fn with_languages(languages: &[lingua::Language]) -> Result<Self> {
        if languages.len() < 2 {
            return Err(TextProcessingError::ConfigError(
                "lingua needs at least two candidate languages".to_string(),
            ));
        }
        Ok(Self {
            detector: LanguageDetectorBuilder::from_languages(languages).build(),
        })
    }

    /// Classifier restricted to recognized language tags; `unknown` is ignored
    pub fn for_tags(tags: &[LanguageTag]) -> Result<Self> {
        let mut languages: Vec<lingua::Language> =
            tags.iter().copied().filter_map(lingua_language).collect();
        languages.sort();
        languages.dedup();
        Self::with_languages(&languages)
    }
}

impl Default for LinguaClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilisticClassifier for LinguaClassifier {
    fn confidences(&self, text: &str) -> Result<Vec<(String, f64)>> {
        if !text.chars().any(char::is_alphabetic) {
            return Err(TextProcessingError::Undetermined(text.to_string()));
        }

        let values = self.detector.compute_language_confidence_values(text);
        if values.is_empty() {
            return Err(TextProcessingError::Undetermined(text.to_string()));
        }

        Ok(values
            .into_iter()
            .map(|(language, confidence)| (language.iso_code_639_1().to_string(), confidence))
            .collect())
    }

    fn name(&self) -> &'static str {
        "lingua"
    }
}

/// Single-label classifier backed by whatlang
pub struct WhatlangClassifier {
    detector: Detector,
}

impl WhatlangClassifier {
    /// Classifier over every language whatlang knows
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
        }
    }

    /// Classifier that only ever guesses one of `tags`
    pub fn for_tags(tags: &[LanguageTag]) -> Self {
        let mut allowlist: Vec<Lang> = tags.iter().copied().filter_map(whatlang_lang).collect();
        allowlist.dedup();
        if allowlist.is_empty() {
            return Self::new();
        }
        Self {
            detector: Detector::with_allowlist(allowlist),
        }
    }

    /// whatlang reports ISO 639-3; map the codes we can speak to 639-1
    fn iso_639_1(lang: Lang) -> String {
        match lang {
            Lang::Eng => "en".to_string(),
            Lang::Deu => "de".to_string(),
            Lang::Rus => "ru".to_string(),
            Lang::Tur => "tr".to_string(),
            other => other.code().to_string(),
        }
    }
}

impl Default for WhatlangClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelClassifier for WhatlangClassifier {
    fn classify(&self, text: &str) -> Result<Option<String>> {
        Ok(self.detector.detect(text).map(|info| Self::iso_639_1(info.lang())))
    }

    fn name(&self) -> &'static str {
        "whatlang"
    }
}
