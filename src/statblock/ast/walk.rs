//! Depth-first traversal
//!
//! Implement [`Visitor`] to walk the tree read-only. Each visit method corresponds to a node
//! type; default implementations are empty, so only the interesting ones need overriding.
//! Prose is visited through `visit_text`, which sees every leaf string, every list item string,
//! every hanging item entry and every table cell, in document order. Section names, item names,
//! table captions and raw JSON fragments are not prose.
//!
//! [`map_text`] rewrites the same set of strings in place.

use super::nodes::{DocumentNode, List, ListEntry, Section, Table};

pub trait Visitor {
    fn visit_text(&mut self, _text: &str) {}
    fn visit_section(&mut self, _section: &Section) {}
    fn visit_list(&mut self, _list: &List) {}
    fn visit_table(&mut self, _table: &Table) {}
}

/// Walk `nodes` depth-first, parents before children.
pub fn walk(nodes: &[DocumentNode], visitor: &mut dyn Visitor) {
    for node in nodes {
        match node {
            DocumentNode::Text(text) => visitor.visit_text(text),
            DocumentNode::Section(section) => walk_section(section, visitor),
            DocumentNode::List(list) => {
                visitor.visit_list(list);
                for entry in &list.items {
                    match entry {
                        ListEntry::Text(text) => visitor.visit_text(text),
                        ListEntry::Item(item) => visitor.visit_text(&item.entry),
                        ListEntry::Section(section) => walk_section(section, visitor),
                    }
                }
            }
            DocumentNode::Table(table) => {
                visitor.visit_table(table);
                for cell in table.rows.iter().flatten() {
                    visitor.visit_text(cell);
                }
            }
            DocumentNode::Raw(_) => {}
        }
    }
}

fn walk_section(section: &Section, visitor: &mut dyn Visitor) {
    visitor.visit_section(section);
    walk(&section.children, visitor);
}

struct TextVisitor<F>(F);

impl<F: FnMut(&str)> Visitor for TextVisitor<F> {
    fn visit_text(&mut self, text: &str) {
        (self.0)(text)
    }
}

/// Call `f` on every prose string.
pub fn for_each_text(nodes: &[DocumentNode], f: impl FnMut(&str)) {
    walk(nodes, &mut TextVisitor(f));
}

/// Replace every prose string with `f(string)`.
pub fn map_text(nodes: &mut [DocumentNode], f: &mut dyn FnMut(&str) -> String) {
    for node in nodes {
        match node {
            DocumentNode::Text(text) => *text = f(text),
            DocumentNode::Section(section) => map_text(&mut section.children, f),
            DocumentNode::List(list) => {
                for entry in &mut list.items {
                    match entry {
                        ListEntry::Text(text) => *text = f(text),
                        ListEntry::Item(item) => item.entry = f(&item.entry),
                        ListEntry::Section(section) => map_text(&mut section.children, f),
                    }
                }
            }
            DocumentNode::Table(table) => {
                for cell in table.rows.iter_mut().flatten() {
                    *cell = f(cell);
                }
            }
            DocumentNode::Raw(_) => {}
        }
    }
}

#[derive(Default)]
struct NodeCounter(usize);

impl Visitor for NodeCounter {
    fn visit_text(&mut self, _text: &str) {
        self.0 += 1;
    }
    fn visit_section(&mut self, _section: &Section) {
        self.0 += 1;
    }
    fn visit_list(&mut self, _list: &List) {
        self.0 += 1;
    }
    fn visit_table(&mut self, _table: &Table) {
        self.0 += 1;
    }
}

/// Number of sections, lists, tables and prose strings in the tree.
pub fn count_nodes(nodes: &[DocumentNode]) -> usize {
    let mut counter = NodeCounter::default();
    walk(nodes, &mut counter);
    counter.0
}
