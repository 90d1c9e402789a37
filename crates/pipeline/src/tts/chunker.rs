//! Request-sized text chunking
//!
//! Some engines only accept short requests. The chunker splits a segment
//! into pieces of at most `max_chars` characters on word boundaries,
//! preferring to cut after punctuation once a piece is reasonably long.

/// Chunker configuration
#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
    /// Hard limit on characters per piece
    pub max_chars: usize,
    /// Pieces at least this long end at the next pause point
    pub min_chars_before_pause: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chars: 100,
            min_chars_before_pause: 50,
        }
    }
}

/// Splits text into request-sized pieces
#[derive(Debug, Clone, Default)]
pub struct RequestChunker {
    config: ChunkerConfig,
}

impl RequestChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self {
            config: ChunkerConfig {
                max_chars: config.max_chars.max(1),
                ..config
            },
        }
    }

    /// Split `text` into pieces; blank text yields none
    pub fn split(&self, text: &str) -> Vec<String> {
        let max = self.config.max_chars;
        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in text.split_whitespace() {
            for part in hard_split(word, max) {
                let part_len = part.chars().count();
                let needed = if current.is_empty() { part_len } else { current_len + 1 + part_len };

                if needed > max && !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                    current_len = 0;
                }

                if !current.is_empty() {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(&part);
                current_len += part_len;

                if current_len >= self.config.min_chars_before_pause && is_pause_point(&part) {
                    pieces.push(std::mem::take(&mut current));
                    current_len = 0;
                }
            }
        }

        if !current.is_empty() {
            pieces.push(current);
        }

        pieces
    }
}

/// Cut a single word into pieces of at most `max` characters
fn hard_split(word: &str, max: usize) -> Vec<String> {
    if word.chars().count() <= max {
        return vec![word.to_string()];
    }
    let chars: Vec<char> = word.chars().collect();
    chars.chunks(max).map(|c| c.iter().collect()).collect()
}

/// Natural place to pause after this word?
fn is_pause_point(word: &str) -> bool {
    word.ends_with(|c: char| matches!(c, '.' | '!' | '?' | ',' | ';' | ':' | '…' | '¿' | '¡'))
}
