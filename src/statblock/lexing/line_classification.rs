//! Line Classification
//!
//! Simple single-line predicates. Markdown mode recognizes the Markdown list markers
//! (`-`, `*`, `+`, `1.`) in addition to the bullet glyphs that PDF copy-paste produces.

use crate::statblock::text::is_title_case;
use once_cell::sync::Lazy;
use regex::Regex;

/// Bullet glyphs found in text copied out of PDFs and web pages.
const BULLETS: &[char] = &['•', '●', '◦', '▪', '▸', '‣', '∙', '·'];

static MARKDOWN_LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+]|\d+[.)])[ \t]+").unwrap());

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?:]").unwrap());

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Check if the line starts with a list marker (after optional indentation).
pub fn is_list_item(line: &str, markdown: bool) -> bool {
    strip_list_marker(line, markdown).is_some()
}

/// Remove the list marker, returning the item text. `None` when the line is not a list item.
pub fn strip_list_marker(line: &str, markdown: bool) -> Option<&str> {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix(BULLETS) {
        return Some(rest.trim_start());
    }
    if markdown {
        if let Some(marker) = MARKDOWN_LIST_MARKER.find(trimmed) {
            return Some(&trimmed[marker.end()..]);
        }
    }
    None
}

/// A standalone heading: no sentence punctuation, opens with a capital, already in title case.
pub fn is_title_line(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || SENTENCE_END.is_match(line) {
        return false;
    }
    if !line.chars().next().is_some_and(char::is_uppercase) {
        return false;
    }
    is_title_case(line)
}
