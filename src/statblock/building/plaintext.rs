//! Plain-text builder
//!
//! Rules, in priority order, for each non-blank line after the name:
//!
//! 1. `@json ` fragment: spliced in as a node, closing any open list.
//! 2. List item: appended to the open list (opening one). An item reading as an inline heading
//!    is stored as `{name, entry}` and marks the list hanging.
//! 3. Dice table (see [table](super::table)).
//! 4. Inline heading: closes every scope and opens a section seeded with the rest of the line.
//! 5. Title line: closes every scope and opens an empty section.
//! 6. Continuation line: space-joined onto the last prose string.
//! 7. Anything else: closes any open list and becomes a prose leaf.
//!
//! A blank line never continues the previous entry; the line after it can still be joined by
//! the normalizer, but not by rule 6.

use super::scope::ScopeStack;
use super::table::read_dice_table;
use super::{parse_json_line, BuiltDocument, Stage};
use crate::statblock::ast::{DocumentNode, Item, ListEntry, HANGING_STYLE};
use crate::statblock::diagnostics::DiagnosticSink;
use crate::statblock::lexing::{
    is_blank, is_continuation_line, is_title_line, split_name_line, strip_list_marker,
    ContinuationRules,
};

pub fn build(text: &str, rules: &ContinuationRules, sink: &mut dyn DiagnosticSink) -> BuiltDocument {
    let lines: Vec<&str> = text.lines().collect();
    let mut stage = Stage::Name;
    let mut name = None;
    let mut stack = ScopeStack::new();
    let mut after_blank = false;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if is_blank(line) {
            after_blank = true;
            i += 1;
            continue;
        }
        match stage {
            Stage::Name => {
                name = Some(line.to_string());
                stage = Stage::Entries;
                i += 1;
            }
            Stage::Entries => {
                i = build_entry(&lines, i, after_blank, &mut stack, rules, sink);
            }
        }
        after_blank = false;
    }

    BuiltDocument {
        name,
        entries: stack.finish(),
    }
}

/// Consume the entry starting at `lines[i]`. Returns the index of the next unread line.
fn build_entry(
    lines: &[&str],
    i: usize,
    after_blank: bool,
    stack: &mut ScopeStack,
    rules: &ContinuationRules,
    sink: &mut dyn DiagnosticSink,
) -> usize {
    let line = lines[i].trim();

    if let Some(node) = parse_json_line(line, sink) {
        stack.close_lists();
        stack.push_node(node);
        return i + 1;
    }

    if let Some(item) = strip_list_marker(line, false) {
        match split_name_line(item) {
            Some(split) => {
                stack.push_list_entry(ListEntry::Item(Item {
                    name: split.name,
                    entry: split.entry,
                }));
                stack.set_list_style(HANGING_STYLE);
            }
            None => stack.push_list_entry(ListEntry::Text(item.to_string())),
        }
        return i + 1;
    }

    if let Some((table, next)) = read_dice_table(lines, i) {
        stack.close_lists();
        stack.push_node(DocumentNode::Table(table));
        return next;
    }

    if let Some(split) = split_name_line(line) {
        log::trace!("inline heading: {:?}", split.name);
        stack.close_all();
        stack.open_section(split.name, vec![DocumentNode::text(split.entry)]);
        return i + 1;
    }

    if is_title_line(line) {
        log::trace!("title line: {:?}", line);
        stack.close_all();
        stack.open_section(line, Vec::new());
        return i + 1;
    }

    if !after_blank && is_continuation_line(stack.last_text(), line, rules) {
        stack.append_to_last_text(line);
        return i + 1;
    }

    stack.close_lists();
    stack.push_node(DocumentNode::text(line));
    i + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statblock::ast::List;
    use crate::statblock::diagnostics::Diagnostics;

    fn build_text(text: &str) -> BuiltDocument {
        build(text, &ContinuationRules::default(), &mut Diagnostics::new())
    }

    #[test]
    fn test_first_line_is_name() {
        let doc = build_text("\n\nHill Dwarf\nYou are stout.");
        assert_eq!(doc.name.as_deref(), Some("Hill Dwarf"));
        assert_eq!(doc.entries, vec![DocumentNode::text("You are stout.")]);
    }

    #[test]
    fn test_inline_headings_open_root_sections() {
        let doc = build_text("Elf\nDarkvision. You can see.\nKeen Senses. You notice.");
        assert_eq!(
            doc.entries,
            vec![
                DocumentNode::section("Darkvision", vec![DocumentNode::text("You can see.")]),
                DocumentNode::section("Keen Senses", vec![DocumentNode::text("You notice.")]),
            ]
        );
    }

    #[test]
    fn test_title_line_collects_following_lines() {
        let doc = build_text("Elf\nElf Traits\nElves are graceful.\nThey live long.");
        let section = doc.entries[0].as_section().unwrap();
        assert_eq!(section.name, "Elf Traits");
        assert_eq!(section.children.len(), 2);
    }

    #[test]
    fn test_continuation_merges_into_leaf() {
        let doc = build_text("Elf\nDarkvision. You can see\nin the dark.");
        assert_eq!(
            doc.entries,
            vec![DocumentNode::section(
                "Darkvision",
                vec![DocumentNode::text("You can see in the dark.")]
            )]
        );
    }

    #[test]
    fn test_blank_line_blocks_continuation() {
        let doc = build_text("Elf\nYou can see\n\nin the dark.");
        assert_eq!(doc.entries.len(), 2);
    }

    #[test]
    fn test_bullets_form_a_list_closed_by_prose() {
        let doc = build_text("Elf\nYou know:\n• Common\n• Elvish\nThat is all.");
        assert_eq!(
            doc.entries,
            vec![
                DocumentNode::text("You know:"),
                DocumentNode::List(List {
                    style: None,
                    items: vec![
                        ListEntry::Text("Common".to_string()),
                        ListEntry::Text("Elvish".to_string()),
                    ],
                }),
                DocumentNode::text("That is all."),
            ]
        );
    }

    #[test]
    fn test_named_bullet_marks_list_hanging() {
        let doc = build_text("Elf\n• Trance. You meditate.\n• plain");
        let list = doc.entries[0].as_list().unwrap();
        assert!(list.is_hanging());
        assert!(matches!(&list.items[0], ListEntry::Item(item) if item.name == "Trance"));
        assert_eq!(list.items[1], ListEntry::Text("plain".to_string()));
    }

    #[test]
    fn test_continuation_joins_list_item() {
        let doc = build_text("Elf\n• You can speak\nand write Elvish.");
        let list = doc.entries[0].as_list().unwrap();
        assert_eq!(
            list.items,
            vec![ListEntry::Text("You can speak and write Elvish.".to_string())]
        );
    }

    #[test]
    fn test_dice_table_is_consumed() {
        let doc = build_text("Elf\nElven Trinkets\nd4 Trinket\n1 A leaf\n2 A twig\nMore prose.");
        let table = doc.entries[0].as_table().unwrap();
        assert_eq!(table.caption.as_deref(), Some("Elven Trinkets"));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(doc.entries[1], DocumentNode::text("More prose."));
    }

    #[test]
    fn test_json_fragment_closes_list() {
        let doc = build_text("Elf\n• Common\n@json {\"type\": \"inset\", \"entries\": []}");
        assert_eq!(doc.entries.len(), 2);
        assert!(matches!(doc.entries[1], DocumentNode::Raw(_)));
    }
}
