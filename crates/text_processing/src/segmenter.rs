//! Word-group segmentation
//!
//! Text is cut into fixed-size word groups, each group is tagged by the
//! language detector, and adjacent groups with the same tag are merged into
//! segments. `unknown` is an ordinary tag here: consecutive unknown groups
//! merge and any tag change closes the current segment.

use polyvoice_core::{DetectionTrace, LanguageDetector, LanguageTag, Segment, WordGroup};
use std::sync::Arc;

/// Default number of words per detection group
pub const DEFAULT_GROUP_SIZE: usize = 4;

/// Segmentation output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    /// Language runs in input order
    pub segments: Vec<Segment>,
    /// Tag assigned to every word group, for diagnostics
    pub trace: DetectionTrace,
}

impl Segmentation {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Distinct recognized languages present, `unknown` excluded
    pub fn languages(&self) -> Vec<LanguageTag> {
        let mut languages: Vec<LanguageTag> = self
            .segments
            .iter()
            .map(|segment| segment.language)
            .filter(LanguageTag::is_known)
            .collect();
        languages.sort();
        languages.dedup();
        languages
    }
}

/// Splits text into language-tagged segments
#[derive(Clone)]
pub struct Segmenter {
    detector: Arc<dyn LanguageDetector>,
    group_size: usize,
}

impl Segmenter {
    /// Create a segmenter; a group size of zero is treated as one
    pub fn new(detector: Arc<dyn LanguageDetector>, group_size: usize) -> Self {
        Self {
            detector,
            group_size: group_size.max(1),
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Segment `text` into ordered language runs
    pub fn segment(&self, text: &str) -> Segmentation {
        let groups = split_word_groups(text, self.group_size);
        let mut trace = DetectionTrace::new();

        let tagged: Vec<(LanguageTag, String)> = groups
            .into_iter()
            .map(|group| {
                let language = self.detector.detect(&group.text);
                trace.record(group.text.clone(), language);
                (language, group.text)
            })
            .collect();

        let segments = merge_runs(tagged);

        tracing::debug!(
            groups = trace.len(),
            segments = segments.len(),
            "Segmented text"
        );

        Segmentation { segments, trace }
    }
}

/// Cut text into groups of `group_size` whitespace-delimited words.
///
/// The last group may be shorter; blank input yields no groups.
pub fn split_word_groups(text: &str, group_size: usize) -> Vec<WordGroup> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(group_size.max(1))
        .enumerate()
        .map(|(index, chunk)| WordGroup::new(index, chunk.join(" ")))
        .collect()
}

/// Greedily merge consecutive same-tag texts into segments
pub fn merge_runs<I>(tagged: I) -> Vec<Segment>
where
    I: IntoIterator<Item = (LanguageTag, String)>,
{
    let mut segments = Vec::new();
    let mut current: Option<LanguageTag> = None;
    let mut buffer: Vec<String> = Vec::new();

    for (language, text) in tagged {
        match current {
            Some(tag) if tag != language => {
                segments.push(Segment::new(tag, buffer.join(" ")));
                buffer.clear();
            }
            _ => {}
        }
        buffer.push(text);
        current = Some(language);
    }

    if let Some(tag) = current {
        if !buffer.is_empty() {
            segments.push(Segment::new(tag, buffer.join(" ")));
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tags a group German when it holds any German marker word
    struct KeywordDetector;

    impl LanguageDetector for KeywordDetector {
        fn detect(&self, text: &str) -> LanguageTag {
            const GERMAN: [&str; 6] = ["guten", "tag", "wie", "geht", "danke", "hallo"];
            const RUSSIAN: [&str; 3] = ["привет", "как", "дела"];

            let lower = text.to_lowercase();
            let words: Vec<&str> = lower.split_whitespace().collect();
            if words.iter().any(|w| GERMAN.contains(w)) {
                LanguageTag::German
            } else if words.iter().any(|w| RUSSIAN.contains(w)) {
                LanguageTag::Russian
            } else if words.iter().all(|w| w.chars().all(|c| c.is_ascii_digit())) {
                LanguageTag::Unknown
            } else {
                LanguageTag::English
            }
        }
    }

    fn segmenter(group_size: usize) -> Segmenter {
        Segmenter::new(Arc::new(KeywordDetector), group_size)
    }

    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn test_word_groups() {
        let groups = split_word_groups("Hello world how are you guten tag wie geht", 4);
        let texts: Vec<&str> = groups.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello world how are", "you guten tag wie", "geht"]);
        assert_eq!(groups[2].index, 2);
    }

    #[test]
    fn test_blank_input_has_no_groups() {
        assert!(split_word_groups("", 4).is_empty());
        assert!(split_word_groups("  \n\t ", 4).is_empty());
        assert!(segmenter(4).segment("   ").is_empty());
    }

    #[test]
    fn test_mixed_english_german() {
        let text = "Hello world how are you guten tag wie geht";
        let result = segmenter(4).segment(text);

        assert_eq!(
            result.segments,
            vec![
                Segment::new(LanguageTag::English, "Hello world how are"),
                Segment::new(LanguageTag::German, "you guten tag wie geht"),
            ]
        );
        assert_eq!(result.trace.len(), 3);
        assert_eq!(result.languages(), vec![LanguageTag::English, LanguageTag::German]);
    }

    #[test]
    fn test_reconstructs_word_sequence() {
        let text = "The word  привет means hello,\n and   danke means thanks 42 17 9 3 and that is all";
        for size in 1..=6 {
            let result = segmenter(size).segment(text);
            let joined = result
                .segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            assert_eq!(words(&joined), words(text), "group size {}", size);
        }
    }

    #[test]
    fn test_adjacent_segments_differ() {
        let text = "one two three four 1 2 3 4 5 6 7 8 hallo there friend ok how are you doing";
        for size in 1..=5 {
            let result = segmenter(size).segment(text);
            for pair in result.segments.windows(2) {
                assert_ne!(pair[0].language, pair[1].language, "group size {}", size);
            }
        }
    }

    #[test]
    fn test_unknown_groups_merge_like_any_tag() {
        let result = segmenter(2).segment("hello there 1 2 3 4 good bye");
        let tags: Vec<_> = result.segments.iter().map(|s| s.language).collect();
        assert_eq!(
            tags,
            vec![LanguageTag::English, LanguageTag::Unknown, LanguageTag::English]
        );
        assert_eq!(result.segments[1].text, "1 2 3 4");
        assert_eq!(result.languages(), vec![LanguageTag::English]);
    }

    #[test]
    fn test_zero_group_size_is_clamped() {
        let s = segmenter(0);
        assert_eq!(s.group_size(), 1);
        assert_eq!(s.segment("a b").trace.len(), 2);
    }

    #[test]
    fn test_merge_runs_direct() {
        let segments = merge_runs(vec![
            (LanguageTag::Russian, "a".to_string()),
            (LanguageTag::Russian, "b".to_string()),
            (LanguageTag::Turkish, "c".to_string()),
        ]);
        assert_eq!(
            segments,
            vec![
                Segment::new(LanguageTag::Russian, "a b"),
                Segment::new(LanguageTag::Turkish, "c"),
            ]
        );
        assert!(merge_runs(Vec::new()).is_empty());
    }
}
