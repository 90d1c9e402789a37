//! `X-Debug-Languages` header rendering
//!
//! The trace is rendered as a list of `(group, tag)` tuples in Python
//! literal syntax, then every non-ASCII character is escaped so the value
//! is a valid header:
//!
//! `[('Hello world', 'en'), ('при', 'ru')]`

use polyvoice_core::DetectionTrace;
use std::fmt::Write;

/// Render a detection trace as an ASCII-only header value
pub fn render_trace(trace: &DetectionTrace) -> String {
    let items: Vec<String> = trace
        .iter()
        .map(|(group, language)| format!("({}, {})", quote(group), quote(language.code())))
        .collect();
    escape_non_ascii(&format!("[{}]", items.join(", ")))
}

/// Quote a string literal, preferring single quotes
fn quote(text: &str) -> String {
    let delimiter = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Escape backslashes and non-ASCII characters (`\xNN`, `\uNNNN`, `\UNNNNNNNN`)
fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        match c {
            '\\' => out.push_str("\\\\"),
            c if c.is_ascii() => out.push(c),
            _ if code < 0x100 => {
                let _ = write!(out, "\\x{:02x}", code);
            }
            _ if code < 0x10000 => {
                let _ = write!(out, "\\u{:04x}", code);
            }
            _ => {
                let _ = write!(out, "\\U{:08x}", code);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyvoice_core::LanguageTag;

    fn trace(entries: &[(&str, LanguageTag)]) -> DetectionTrace {
        let mut trace = DetectionTrace::new();
        for (group, language) in entries {
            trace.record(*group, *language);
        }
        trace
    }

    #[test]
    fn test_ascii_trace() {
        let t = trace(&[
            ("Hello world how are", LanguageTag::English),
            ("you guten tag wie", LanguageTag::German),
        ]);
        assert_eq!(
            render_trace(&t),
            "[('Hello world how are', 'en'), ('you guten tag wie', 'de')]"
        );
    }

    #[test]
    fn test_empty_trace() {
        assert_eq!(render_trace(&DetectionTrace::new()), "[]");
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let t = trace(&[("привет für 😀", LanguageTag::Unknown)]);
        assert_eq!(
            render_trace(&t),
            "[('\\u043f\\u0440\\u0438\\u0432\\u0435\\u0442 f\\xfcr \\U0001f600', 'unknown')]"
        );
    }

    #[test]
    fn test_quotes_and_backslashes() {
        let t = trace(&[("don't", LanguageTag::English), ("a\\b 'x\"", LanguageTag::English)]);
        assert_eq!(
            render_trace(&t),
            r#"[("don't", 'en'), ('a\\\\b \\'x"', 'en')]"#
        );
    }

    #[test]
    fn test_output_is_header_safe() {
        let t = trace(&[("Straße ğüşiöç", LanguageTag::Turkish)]);
        let rendered = render_trace(&t);
        assert!(rendered.chars().all(|c| c.is_ascii_graphic() || c == ' '));
        assert!(axum::http::HeaderValue::from_str(&rendered).is_ok());
    }
}
