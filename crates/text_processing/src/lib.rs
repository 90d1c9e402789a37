//! Text processing for mixed-language narration
//!
//! This crate provides:
//! - **Language detection**: a probabilistic classifier checked against a
//!   ranked priority list, with a single-label fallback classifier
//! - **Segmentation**: fixed-size word groups merged into language runs
//!
//! # Example
//!
//! ```ignore
//! use polyvoice_text_processing::{create_detector, Segmenter};
//!
//! let detector = create_detector(&settings.detection);
//! let segmenter = Segmenter::new(detector, 4);
//!
//! let result = segmenter.segment("Hello world how are you guten tag wie geht");
//! for segment in &result.segments {
//!     println!("{}: {}", segment.language, segment.text);
//! }
//! ```

pub mod detection;
pub mod segmenter;

mod error;

pub use detection::{
    create_detector, LabelClassifier, LinguaClassifier, PriorityLanguageDetector,
    ProbabilisticClassifier, WhatlangClassifier,
};
pub use error::{Result, TextProcessingError};
pub use segmenter::{merge_runs, split_word_groups, Segmentation, Segmenter};
