//! Markdown builder
//!
//! Markdown declares its structure, so nothing is inferred from case:
//!
//! - `#`..`######` headings open sections; a deeper heading nests inside a shallower one.
//!   A level 5 or 6 heading directly above a pipe table becomes the table caption.
//! - `**Name.** text` (also `***Name.***` and `__Name.__`) opens a run-in section that lasts
//!   until the next blank line or heading.
//! - Consecutive prose lines form one paragraph.
//! - `-`/`*`/`+`/`1.` items form lists; a more indented item opens a nested list, which is
//!   attached to its parent item by wrapping that item in an unnamed section.
//! - `>` blockquote prefixes are stripped and `---`/`___`/`***` rules are ignored, which is how
//!   stat block frames are written in homebrew documents.
//!
//! Headings and run-in headers are tracked on a local scope stack parallel to the shared
//! [`ScopeStack`]. Open lists are kept locally by indentation and only handed to the shared
//! stack when they close. Inline markup in prose is converted to `{@b}`/`{@i}`/`{@code}` once
//! the tree is complete, so spans broken across joined lines still pair up.

use super::scope::ScopeStack;
use super::{parse_json_line, BuiltDocument, Stage};
use crate::statblock::ast::{map_text, DocumentNode, Item, List, ListEntry, Section, Table};
use crate::statblock::ast::HANGING_STYLE;
use crate::statblock::diagnostics::DiagnosticSink;
use crate::statblock::inlines;
use crate::statblock::lexing::strip_list_marker;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*?)\s*#*$").unwrap());

static INLINE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\*{2,3}|__)([^*_\s].*?[.!?:])(?:\*{2,3}|__)(?:\s+(.*))?$").unwrap()
});

static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-{3,}|_{3,}|\*{3,})$").unwrap());

static TABLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?$").unwrap());

/// Scopes opened by markup, parallel to the shared stack's frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MdScope {
    Heading(usize),
    InlineHeader,
}

struct MarkdownBuilder<'s> {
    stack: ScopeStack,
    scopes: Vec<MdScope>,
    /// Open lists, outermost first, with the indentation of their items.
    lists: Vec<(usize, List)>,
    in_paragraph: bool,
    pending_caption: Option<String>,
    sink: &'s mut dyn DiagnosticSink,
}

pub fn build(text: &str, sink: &mut dyn DiagnosticSink) -> BuiltDocument {
    let lines: Vec<String> = text
        .lines()
        .map(strip_blockquote)
        .map(|line| if is_rule(&line) { String::new() } else { line })
        .collect();

    let mut builder = MarkdownBuilder {
        stack: ScopeStack::new(),
        scopes: Vec::new(),
        lists: Vec::new(),
        in_paragraph: false,
        pending_caption: None,
        sink,
    };

    let mut stage = Stage::Name;
    let mut name = None;
    let mut after_blank = false;
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].as_str();
        if line.trim().is_empty() {
            builder.blank_line();
            after_blank = true;
            i += 1;
            continue;
        }
        match stage {
            Stage::Name => {
                let text = HEADING
                    .captures(line.trim())
                    .map(|caps| caps[2].to_string())
                    .unwrap_or_else(|| line.trim().to_string());
                name = Some(inlines::strip_markup(&text));
                stage = Stage::Entries;
                i += 1;
            }
            Stage::Entries => i = builder.line(&lines, i, after_blank),
        }
        after_blank = false;
    }

    builder.close_lists();
    let mut entries = builder.stack.finish();
    map_text(&mut entries, &mut |text| inlines::to_tags(text));
    BuiltDocument { name, entries }
}

impl MarkdownBuilder<'_> {
    fn blank_line(&mut self) {
        self.in_paragraph = false;
        while self.scopes.last() == Some(&MdScope::InlineHeader) {
            self.close_lists();
            self.close_scope();
        }
    }

    /// Consume the entry starting at `lines[i]`. Returns the index of the next unread line.
    fn line(&mut self, lines: &[String], i: usize, after_blank: bool) -> usize {
        let raw = lines[i].as_str();
        let line = raw.trim();

        if let Some(node) = parse_json_line(line, self.sink) {
            self.close_lists();
            self.in_paragraph = false;
            self.stack.push_node(node);
            return i + 1;
        }

        if let Some(caps) = HEADING.captures(line) {
            let level = caps[1].len();
            let text = inlines::strip_markup(&caps[2]);
            self.close_lists();
            self.in_paragraph = false;
            if level >= 5 && next_is_table(lines, i + 1) {
                self.pending_caption = Some(text);
                return i + 1;
            }
            self.open_heading(level, text);
            return i + 1;
        }

        if is_table_start(lines, i) {
            self.close_lists();
            self.in_paragraph = false;
            return self.table(lines, i);
        }

        if let Some(item) = strip_list_marker(raw, true) {
            let indent = indentation(raw);
            self.in_paragraph = false;
            self.list_item(indent, item.trim());
            return i + 1;
        }

        if !self.lists.is_empty() {
            let continues_item = indentation(raw) > 0 || !after_blank;
            if continues_item && !INLINE_HEADER.is_match(line) {
                self.append_to_list_item(line);
                return i + 1;
            }
            self.close_lists();
        }

        if let Some(caps) = INLINE_HEADER.captures(line) {
            let name = heading_name(&caps[1]);
            let rest = caps.get(2).map_or("", |m| m.as_str()).trim();
            if self.scopes.last() == Some(&MdScope::InlineHeader) {
                self.close_scope();
            }
            let children = if rest.is_empty() {
                Vec::new()
            } else {
                vec![DocumentNode::text(rest)]
            };
            self.stack.open_section(name, children);
            self.scopes.push(MdScope::InlineHeader);
            self.in_paragraph = !rest.is_empty();
            return i + 1;
        }

        if !(self.in_paragraph && self.stack.append_to_last_text(line)) {
            self.stack.push_node(DocumentNode::text(line));
        }
        self.in_paragraph = true;
        i + 1
    }

    fn open_heading(&mut self, level: usize, text: String) {
        while let Some(&scope) = self.scopes.last() {
            match scope {
                MdScope::Heading(open) if open < level => break,
                _ => self.close_scope(),
            }
        }
        self.stack.open_section(text, Vec::new());
        self.scopes.push(MdScope::Heading(level));
    }

    fn close_scope(&mut self) {
        self.scopes.pop();
        self.stack.close_to_depth(self.scopes.len());
    }

    fn table(&mut self, lines: &[String], start: usize) -> usize {
        let column_labels = split_cells(&lines[start]);
        let mut rows = Vec::new();
        let mut end = start + 2;
        while let Some(line) = lines.get(end) {
            if !line.trim_start().starts_with('|') {
                break;
            }
            rows.push(split_cells(line));
            end += 1;
        }
        self.stack.push_node(DocumentNode::Table(Table {
            caption: self.pending_caption.take(),
            column_labels,
            rows,
        }));
        end
    }

    fn list_item(&mut self, indent: usize, text: &str) {
        let entry = match INLINE_HEADER.captures(text) {
            Some(caps) => ListEntry::Item(Item {
                name: heading_name(&caps[1]),
                entry: caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
            }),
            None => ListEntry::Text(text.to_string()),
        };
        let is_item = matches!(entry, ListEntry::Item(_));

        while self.lists.last().is_some_and(|(open, _)| *open > indent) {
            self.close_top_list();
        }
        match self.lists.last_mut() {
            Some((open, list)) if *open == indent => list.items.push(entry),
            _ => self.lists.push((
                indent,
                List {
                    style: None,
                    items: vec![entry],
                },
            )),
        }
        if is_item {
            if let Some((_, list)) = self.lists.last_mut() {
                list.style = Some(HANGING_STYLE.to_string());
            }
        }
    }

    /// Lazy or indented continuation of the innermost list's last item.
    fn append_to_list_item(&mut self, line: &str) {
        let Some((_, list)) = self.lists.last_mut() else {
            return;
        };
        let target = match list.items.last_mut() {
            Some(ListEntry::Text(text)) => Some(text),
            Some(ListEntry::Item(item)) => Some(&mut item.entry),
            Some(ListEntry::Section(section)) => match section.children.last_mut() {
                Some(DocumentNode::Text(text)) => Some(text),
                _ => None,
            },
            None => None,
        };
        match target {
            Some(text) => *text = format!("{} {}", text.trim_end(), line),
            None => list.items.push(ListEntry::Text(line.to_string())),
        }
    }

    fn close_top_list(&mut self) {
        let Some((_, child)) = self.lists.pop() else {
            return;
        };
        let Some((_, parent)) = self.lists.last_mut() else {
            self.stack.push_node(DocumentNode::List(child));
            return;
        };
        let child = DocumentNode::List(child);
        match parent.items.pop() {
            Some(ListEntry::Text(text)) => parent.items.push(ListEntry::Section(Section::new(
                "",
                vec![DocumentNode::Text(text), child],
            ))),
            Some(ListEntry::Item(item)) => parent.items.push(ListEntry::Section(Section::new(
                item.name,
                vec![DocumentNode::Text(item.entry), child],
            ))),
            Some(ListEntry::Section(mut section)) => {
                section.children.push(child);
                parent.items.push(ListEntry::Section(section));
            }
            None => parent
                .items
                .push(ListEntry::Section(Section::new("", vec![child]))),
        }
    }

    fn close_lists(&mut self) {
        while !self.lists.is_empty() {
            self.close_top_list();
        }
    }
}

/// Remove `>` blockquote markers, keeping indentation after them.
fn strip_blockquote(line: &str) -> String {
    let mut rest = line;
    while let Some(stripped) = rest.trim_start().strip_prefix('>') {
        rest = stripped.strip_prefix(' ').unwrap_or(stripped);
    }
    rest.trim_end().to_string()
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|ch| !ch.is_whitespace()).collect();
    RULE.is_match(&compact)
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|ch| ch.is_whitespace())
        .map(|ch| if ch == '\t' { 4 } else { 1 })
        .sum()
}

fn is_table_start(lines: &[String], i: usize) -> bool {
    lines[i].trim_start().starts_with('|')
        && lines
            .get(i + 1)
            .is_some_and(|next| next.contains('-') && TABLE_SEPARATOR.is_match(next.trim()))
}

fn next_is_table(lines: &[String], from: usize) -> bool {
    (from..lines.len())
        .find(|&i| !lines[i].trim().is_empty())
        .is_some_and(|i| is_table_start(lines, i))
}

fn split_cells(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// `"Darkvision."` -> `"Darkvision"`; `"Why Not?"` keeps its mark.
fn heading_name(raw: &str) -> String {
    let name = raw.trim().trim_end_matches(['.', ':']);
    inlines::strip_markup(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statblock::diagnostics::Diagnostics;

    fn build_md(text: &str) -> BuiltDocument {
        build(text, &mut Diagnostics::new())
    }

    #[test]
    fn test_heading_is_name() {
        let doc = build_md("# Hill Dwarf\nStout folk.");
        assert_eq!(doc.name.as_deref(), Some("Hill Dwarf"));
        assert_eq!(doc.entries, vec![DocumentNode::text("Stout folk.")]);
    }

    #[test]
    fn test_headings_nest_by_level() {
        let doc = build_md("# Elf\n## Traits\n### Trance\nYou meditate.\n## Lore\nOld.");
        assert_eq!(
            doc.entries,
            vec![
                DocumentNode::section(
                    "Traits",
                    vec![DocumentNode::section(
                        "Trance",
                        vec![DocumentNode::text("You meditate.")]
                    )]
                ),
                DocumentNode::section("Lore", vec![DocumentNode::text("Old.")]),
            ]
        );
    }

    #[test]
    fn test_paragraph_lines_join() {
        let doc = build_md("# Elf\nElves are\ngraceful.\n\nThey live long.");
        assert_eq!(
            doc.entries,
            vec![
                DocumentNode::text("Elves are graceful."),
                DocumentNode::text("They live long."),
            ]
        );
    }

    #[test]
    fn test_inline_header_until_blank_line() {
        let doc = build_md("# Elf\n***Darkvision.*** You can see\nin the dark.\n\nAfter.");
        assert_eq!(
            doc.entries,
            vec![
                DocumentNode::section(
                    "Darkvision",
                    vec![DocumentNode::text("You can see in the dark.")]
                ),
                DocumentNode::text("After."),
            ]
        );
    }

    #[test]
    fn test_inline_markup_becomes_tags() {
        let doc = build_md("# Elf\nYou are **very** *graceful*.");
        assert_eq!(
            doc.entries,
            vec![DocumentNode::text("You are {@b very} {@i graceful}.")]
        );
    }

    #[test]
    fn test_blockquote_and_rules_are_stripped() {
        let doc = build_md("___\n> ## Goblin\n> ___\n> Small and sneaky.");
        assert_eq!(doc.name.as_deref(), Some("Goblin"));
        assert_eq!(doc.entries, vec![DocumentNode::text("Small and sneaky.")]);
    }

    #[test]
    fn test_nested_list_wraps_parent_item() {
        let doc = build_md("# Elf\n- Languages\n  - Common\n  - Elvish\n- Tools");
        let list = doc.entries[0].as_list().unwrap();
        assert_eq!(list.items.len(), 2);
        match &list.items[0] {
            ListEntry::Section(section) => {
                assert!(section.name.is_empty());
                assert_eq!(section.children[0], DocumentNode::text("Languages"));
                assert_eq!(section.children[1].as_list().unwrap().items.len(), 2);
            }
            other => panic!("expected a wrapped item, got {:?}", other),
        }
        assert_eq!(list.items[1], ListEntry::Text("Tools".to_string()));
    }

    #[test]
    fn test_bold_list_items_are_hanging() {
        let doc = build_md("# Elf\n- **Trance.** You meditate.\n- **Keen Senses.** You notice.");
        let list = doc.entries[0].as_list().unwrap();
        assert!(list.is_hanging());
        assert_eq!(
            list.items[1],
            ListEntry::Item(Item {
                name: "Keen Senses".to_string(),
                entry: "You notice.".to_string()
            })
        );
    }

    #[test]
    fn test_pipe_table_with_caption() {
        let doc = build_md(
            "# Elf\n##### Elven Names\n| d4 | Name |\n|:--:|------|\n| 1 | Ara |\n| 2 | *Bel* |\nAfter.",
        );
        let table = doc.entries[0].as_table().unwrap();
        assert_eq!(table.caption.as_deref(), Some("Elven Names"));
        assert_eq!(table.column_labels, vec!["d4", "Name"]);
        assert_eq!(table.rows, vec![vec!["1", "Ara"], vec!["2", "{@i Bel}"]]);
        assert_eq!(doc.entries[1], DocumentNode::text("After."));
    }
}
