//! Open-scope stack
//!
//! The builders append every produced node to the innermost open scope. A scope is attached to
//! its parent only when it closes, so the stack top is always where the next node goes. Nothing
//! else is appended to a parent while a child scope is open, which keeps document order.

use crate::statblock::ast::{DocumentNode, Item, List, ListEntry, Section};

#[derive(Debug)]
enum Frame {
    Section(Section),
    List(List),
}

#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    root: Vec<DocumentNode>,
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of open scopes above the root.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn in_list(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::List(_)))
    }

    /// Append a node to the innermost scope.
    pub(crate) fn push_node(&mut self, node: DocumentNode) {
        match self.frames.last_mut() {
            None => self.root.push(node),
            Some(Frame::Section(section)) => section.children.push(node),
            Some(Frame::List(list)) => list.items.push(match node {
                DocumentNode::Text(text) => ListEntry::Text(text),
                DocumentNode::Section(section) => ListEntry::Section(section),
                other => ListEntry::Section(Section::new("", vec![other])),
            }),
        }
    }

    /// Make the innermost scope a list, opening one if needed.
    pub(crate) fn open_list(&mut self) {
        if !self.in_list() {
            self.frames.push(Frame::List(List::default()));
        }
    }

    /// Append an item to the innermost list. Opens the list if needed.
    pub(crate) fn push_list_entry(&mut self, entry: ListEntry) {
        self.open_list();
        if let Some(Frame::List(list)) = self.frames.last_mut() {
            list.items.push(entry);
        }
    }

    /// Set the style of the innermost list.
    pub(crate) fn set_list_style(&mut self, style: &str) {
        if let Some(Frame::List(list)) = self.frames.last_mut() {
            list.style = Some(style.to_string());
        }
    }

    pub(crate) fn open_section(&mut self, name: impl Into<String>, children: Vec<DocumentNode>) {
        self.frames.push(Frame::Section(Section::new(name, children)));
    }

    /// Close the innermost scope into its parent.
    pub(crate) fn close(&mut self) {
        let node = match self.frames.pop() {
            Some(Frame::Section(section)) => DocumentNode::Section(section),
            Some(Frame::List(list)) => DocumentNode::List(list),
            None => return,
        };
        self.push_node(node);
    }

    pub(crate) fn close_lists(&mut self) {
        while self.in_list() {
            self.close();
        }
    }

    /// Close scopes until at most `depth` remain open.
    pub(crate) fn close_to_depth(&mut self, depth: usize) {
        while self.frames.len() > depth {
            self.close();
        }
    }

    pub(crate) fn close_all(&mut self) {
        self.close_to_depth(0);
    }

    /// The last prose string of the innermost scope, if its last entry is prose.
    pub(crate) fn last_text(&self) -> Option<&str> {
        match self.frames.last() {
            None => last_node_text(&self.root),
            Some(Frame::Section(section)) => last_node_text(&section.children),
            Some(Frame::List(list)) => match list.items.last()? {
                ListEntry::Text(text) => Some(text.as_str()),
                ListEntry::Item(Item { entry, .. }) => Some(entry.as_str()),
                ListEntry::Section(_) => None,
            },
        }
    }

    pub(crate) fn last_text_mut(&mut self) -> Option<&mut String> {
        match self.frames.last_mut() {
            None => last_node_text_mut(&mut self.root),
            Some(Frame::Section(section)) => last_node_text_mut(&mut section.children),
            Some(Frame::List(list)) => match list.items.last_mut()? {
                ListEntry::Text(text) => Some(text),
                ListEntry::Item(Item { entry, .. }) => Some(entry),
                ListEntry::Section(_) => None,
            },
        }
    }

    /// Space-join `line` onto the last prose string. Returns `false` when there is none.
    pub(crate) fn append_to_last_text(&mut self, line: &str) -> bool {
        match self.last_text_mut() {
            Some(text) => {
                let joined = format!("{} {}", text.trim_end(), line.trim_start());
                *text = joined;
                true
            }
            None => false,
        }
    }

    /// Close every scope and return the root nodes.
    pub(crate) fn finish(mut self) -> Vec<DocumentNode> {
        self.close_all();
        self.root
    }
}

fn last_node_text(nodes: &[DocumentNode]) -> Option<&str> {
    nodes.last()?.as_text()
}

fn last_node_text_mut(nodes: &mut [DocumentNode]) -> Option<&mut String> {
    match nodes.last_mut()? {
        DocumentNode::Text(text) => Some(text),
        _ => None,
    }
}
