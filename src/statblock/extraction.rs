//! Field extraction
//!
//!     Builders only know about prose structure. Extraction promotes the sections that carry
//!     typed data ("Size. You are Medium.") into typed fields of the entity record, and deletes
//!     the prose when the typed field says everything the prose said.
//!
//!     Every field follows the same protocol:
//!
//!         1. Find the section by its label, case-insensitively, anywhere in the section tree.
//!         2. Require exactly one prose line in it; otherwise warn and leave the field unset.
//!         3. Try a fixed, ordered list of anchored phrasings. The first match fills the field
//!            and decides whether the section is redundant. No match warns.
//!
//!     A phrasing that is not understood never aborts: the prose stays in `entries` for manual
//!     fix-up and the conversion carries on.

pub mod race;

use crate::statblock::ast::{DocumentNode, Section};
use crate::statblock::diagnostics::DiagnosticSink;

pub use race::extract_race;

/// Path to a section: child indices from the root through nested sections.
pub type SectionPath = Vec<usize>;

/// Find the first section, depth-first, whose name matches one of `labels`.
pub fn find_section(nodes: &[DocumentNode], labels: &[&str]) -> Option<SectionPath> {
    for (index, node) in nodes.iter().enumerate() {
        let DocumentNode::Section(section) = node else {
            continue;
        };
        if labels.iter().any(|label| section.is_named(label)) {
            return Some(vec![index]);
        }
        if let Some(mut path) = find_section(&section.children, labels) {
            path.insert(0, index);
            return Some(path);
        }
    }
    None
}

/// The section a path points at.
pub fn section_at<'a>(nodes: &'a [DocumentNode], path: &[usize]) -> Option<&'a Section> {
    let (first, rest) = path.split_first()?;
    let section = nodes.get(*first)?.as_section()?;
    if rest.is_empty() {
        Some(section)
    } else {
        section_at(&section.children, rest)
    }
}

/// Remove the node a path points at.
pub fn remove_at(nodes: &mut Vec<DocumentNode>, path: &[usize]) -> Option<DocumentNode> {
    match path {
        [] => None,
        [index] if *index < nodes.len() => Some(nodes.remove(*index)),
        [_] => None,
        [first, rest @ ..] => match nodes.get_mut(*first) {
            Some(DocumentNode::Section(section)) => remove_at(&mut section.children, rest),
            _ => None,
        },
    }
}

/// Result of looking a field's section up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    Missing,
    /// Present, but not exactly one prose line.
    Malformed(SectionPath),
    Line(SectionPath, String),
}

/// Whether a missing section is worth a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Locate the section for one field and apply the missing/malformed warning policy.
///
/// Returns the path and the single prose line when the section is usable.
pub fn field_line(
    entries: &[DocumentNode],
    labels: &[&str],
    presence: Presence,
    code: &'static str,
    sink: &mut dyn DiagnosticSink,
) -> Option<(SectionPath, String)> {
    let source = match find_section(entries, labels) {
        None => FieldSource::Missing,
        Some(path) => match section_at(entries, &path).and_then(Section::single_text) {
            Some(text) => FieldSource::Line(path, text.trim().to_string()),
            None => FieldSource::Malformed(path),
        },
    };

    match source {
        FieldSource::Line(path, text) => Some((path, text)),
        FieldSource::Missing => {
            if presence == Presence::Required {
                sink.warn(code, format!("No \"{}\" section found", labels[0]));
            }
            None
        }
        FieldSource::Malformed(_) => {
            sink.warn(
                code,
                format!(
                    "\"{}\" section is not a single line of text and requires manual conversion",
                    labels[0]
                ),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statblock::diagnostics::Diagnostics;

    fn sample() -> Vec<DocumentNode> {
        vec![
            DocumentNode::text("intro"),
            DocumentNode::section(
                "Traits",
                vec![
                    DocumentNode::section("Size", vec![DocumentNode::text("You are Medium.")]),
                    DocumentNode::section(
                        "Speed",
                        vec![DocumentNode::text("a"), DocumentNode::text("b")],
                    ),
                ],
            ),
        ]
    }

    #[test]
    fn test_find_nested_section() {
        let entries = sample();
        let path = find_section(&entries, &["size"]).unwrap();
        assert_eq!(path, vec![1, 0]);
        assert_eq!(section_at(&entries, &path).unwrap().name, "Size");
        assert_eq!(find_section(&entries, &["Darkvision"]), None);
    }

    #[test]
    fn test_remove_nested_section() {
        let mut entries = sample();
        let removed = remove_at(&mut entries, &[1, 0]);
        assert!(matches!(removed, Some(DocumentNode::Section(ref s)) if s.name == "Size"));
        assert_eq!(entries[1].as_section().unwrap().children.len(), 1);
        assert_eq!(remove_at(&mut entries, &[9]), None);
    }

    #[test]
    fn test_field_line_policy() {
        let entries = sample();
        let mut diagnostics = Diagnostics::new();

        let found = field_line(&entries, &["Size"], Presence::Required, "size", &mut diagnostics);
        assert_eq!(found, Some((vec![1, 0], "You are Medium.".to_string())));

        assert_eq!(
            field_line(&entries, &["Speed"], Presence::Optional, "speed", &mut diagnostics),
            None
        );
        assert_eq!(
            field_line(&entries, &["Languages"], Presence::Optional, "languages", &mut diagnostics),
            None
        );
        assert_eq!(
            field_line(&entries, &["Darkvision"], Presence::Required, "darkvision", &mut diagnostics),
            None
        );
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["speed", "darkvision"]);
    }
}
