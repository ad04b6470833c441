//! Markdown cleanup for model output.
//!
//! The model is asked for plain prose but occasionally answers with
//! emphasis, headings or lists anyway. Five substitutions run in a fixed
//! order over the whole text; the line-anchored ones use multi-line mode.

use regex::Regex;
use std::sync::LazyLock;

/// Emphasis and code delimiters: `*`, `**`, `_`, `__`, and backtick runs.
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\*{1,2}|_{1,2}|`+)").unwrap());

/// Heading markers at the start of a line.
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s*").unwrap());

/// A single bullet character followed by whitespace.
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[\-\*\+•]\s+").unwrap());

/// Ordered-list prefixes like "1. ".
static ORDERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s+").unwrap());

/// Horizontal rules (`---`, `***`, `___`) occupying a whole line.
static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[-*_]{3,}\s*$").unwrap());

/// Strip markdown markup from `text` and trim the result.
///
/// Total over its input: empty input comes back empty.
pub fn strip_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = EMPHASIS.replace_all(text, "");
    let text = HEADING.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "");
    let text = ORDERED.replace_all(&text, "");
    let text = RULE.replace_all(&text, "");

    text.trim().to_string()
}
