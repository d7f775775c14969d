//! Input Normalization
//!
//!     Pasted stat blocks come out of PDFs and web pages with their line wrapping intact:
//!     words split by a hyphen at the margin, parentheses opened on one line and closed on the
//!     next, sentences broken after "the". None of that is structure, and leaving it in place
//!     would make every later stage guess. This module repairs those artifacts on the raw text,
//!     before any line is classified.
//!
//!     The pass is total: it never fails, and text it does not recognize passes through
//!     unchanged. Each repair is a narrow rule; ambiguous breaks are left alone rather than
//!     guessed. The rule set runs to a fixed point, so normalizing normalized text is a no-op.
//!
//!     The one side channel is the `PAGE=<n>` directive: a line holding only that directive is
//!     removed and its value written to the caller's options.

mod brackets;
mod joins;

use crate::statblock::pipeline::ConvertOptions;
use once_cell::sync::Lazy;
use regex::Regex;

static PAGE_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*PAGE=(\d+)[ \t]*(?:\n|$)").unwrap());

/// Normalize raw pasted text.
///
/// When `options` is given, a `PAGE=<n>` directive line is stripped and its value stored in
/// `options.page`.
pub fn normalize(raw: &str, options: Option<&mut ConvertOptions>) -> String {
    let mut text = canonicalize_characters(raw);

    if let Some(options) = options {
        if let Some(page) = extract_page(&mut text) {
            log::debug!("PAGE directive found: {}", page);
            options.page = Some(page);
        }
    }

    // Every rule either removes at least one newline or leaves the text untouched.
    loop {
        let next = apply_rules(&text);
        if next == text {
            break;
        }
        text = next;
    }

    log::debug!("normalized input into {} lines", text.lines().count());
    text
}

/// Canonical line endings, no soft hyphens, plain spaces and plain hyphens.
fn canonicalize_characters(raw: &str) -> String {
    let text = raw
        .replace("\r\n", "\n")
        .replace("\n\r", "\n")
        .replace('\r', "\n");
    text.chars()
        .filter(|ch| *ch != '\u{00AD}')
        .map(|ch| match ch {
            '\u{00A0}' | '\u{202F}' | '\u{2007}' => ' ',
            '\u{2212}' | '\u{2013}' | '\u{2012}' => '-',
            other => other,
        })
        .collect()
}

fn extract_page(text: &mut String) -> Option<u32> {
    let page = PAGE_DIRECTIVE
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())?;
    *text = PAGE_DIRECTIVE.replace_all(text, "").into_owned();
    Some(page)
}

fn apply_rules(text: &str) -> String {
    let text = joins::rejoin_hyphenated_words(text);
    let text = brackets::balance_pairs(&text);
    let text = joins::join_commas(&text);
    joins::join_continuations(&text)
}
