//! Document building
//!
//!     The builders turn normalized lines into the entity name and a [`DocumentNode`] tree. The
//!     first non-blank line is the entity name; every later line goes through a fixed priority
//!     list of rules and the first rule that matches decides what the line becomes.
//!
//!     There are two input formats and each has its own builder:
//!
//!         - plaintext: structure is inferred from case and punctuation, using the line
//!           classifier as the oracle.
//!         - markdown: structure is declared by markup (`#` headings, `**Name.**` run-in
//!           headings, indented lists), tracked on a local scope stack.
//!
//!     Both share the open-scope stack in [scope] and the raw-JSON escape hatch below. Neither
//!     ever fails: a line no rule claims becomes a plain prose leaf.
//!
//!     After building, [cleanup] turns lists whose items all read as inline headings into
//!     hanging lists.

pub mod cleanup;
pub mod markdown;
pub mod plaintext;
pub(crate) mod scope;
pub mod table;

use crate::statblock::ast::{from_json, DocumentNode};
use crate::statblock::diagnostics::DiagnosticSink;
use crate::statblock::lexing::ContinuationRules;
use serde::Deserialize;

pub use cleanup::convert_hanging_lists;

/// Prefix of a line holding a pre-structured JSON fragment.
pub const JSON_SENTINEL: &str = "@json ";

/// Format of the pasted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    #[serde(alias = "text")]
    PlainText,
    Markdown,
}

/// Builder state. The first non-blank line is the name; all others are entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Name,
    Entries,
}

/// Output of a builder.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuiltDocument {
    pub name: Option<String>,
    pub entries: Vec<DocumentNode>,
}

/// Build a document from normalized text.
pub fn build(
    text: &str,
    format: InputFormat,
    rules: &ContinuationRules,
    sink: &mut dyn DiagnosticSink,
) -> BuiltDocument {
    let mut document = match format {
        InputFormat::PlainText => plaintext::build(text, rules, sink),
        InputFormat::Markdown => markdown::build(text, sink),
    };
    // Item names must still be untagged prose for the split to recognize them.
    let converted = convert_hanging_lists(&mut document.entries);
    log::debug!(
        "built {} top-level entries ({} nodes, {} hanging lists)",
        document.entries.len(),
        crate::statblock::ast::count_nodes(&document.entries),
        converted
    );
    document
}

/// Parse a sentinel line into a node. A malformed fragment warns and stays as prose.
pub(crate) fn parse_json_line(line: &str, sink: &mut dyn DiagnosticSink) -> Option<DocumentNode> {
    let fragment = line.strip_prefix(JSON_SENTINEL)?;
    match serde_json::from_str(fragment) {
        Ok(value) => Some(from_json(value)),
        Err(e) => {
            sink.warn(
                "json",
                format!("Could not parse JSON fragment ({}); kept as text: {}", e, line),
            );
            Some(DocumentNode::text(line))
        }
    }
}
