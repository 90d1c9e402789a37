//! Language tags
//!
//! The narration service only speaks a small, fixed set of languages.
//! Anything the detectors cannot place in that set is tagged [`LanguageTag::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recognized language code, or the `unknown` sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LanguageTag {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "tr")]
    Turkish,
    #[serde(rename = "unknown")]
    #[default]
    Unknown,
}

impl LanguageTag {
    /// Every recognized language, in default priority order
    pub const RECOGNIZED: [LanguageTag; 4] = [
        LanguageTag::English,
        LanguageTag::German,
        LanguageTag::Russian,
        LanguageTag::Turkish,
    ];

    /// ISO 639-1 code (or `unknown`)
    pub fn code(&self) -> &'static str {
        match self {
            LanguageTag::English => "en",
            LanguageTag::German => "de",
            LanguageTag::Russian => "ru",
            LanguageTag::Turkish => "tr",
            LanguageTag::Unknown => "unknown",
        }
    }

    /// Human readable language name
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageTag::English => "English",
            LanguageTag::German => "German",
            LanguageTag::Russian => "Russian",
            LanguageTag::Turkish => "Turkish",
            LanguageTag::Unknown => "Unknown",
        }
    }

    /// Is this one of the recognized languages?
    pub fn is_known(&self) -> bool {
        !matches!(self, LanguageTag::Unknown)
    }

    /// Map an ISO 639-1 code to a recognized language.
    ///
    /// Returns `None` for codes outside the recognized set, including `unknown`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(LanguageTag::English),
            "de" => Some(LanguageTag::German),
            "ru" => Some(LanguageTag::Russian),
            "tr" => Some(LanguageTag::Turkish),
            _ => None,
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageTag {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("unknown") {
            return Ok(LanguageTag::Unknown);
        }
        Self::from_code(s).ok_or_else(|| crate::Error::Other(format!("unrecognized language code '{}'", s)))
    }
}
