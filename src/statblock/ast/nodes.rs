//! Node types

/// Style of a list whose items are all `{name, entry}` pairs.
pub const HANGING_STYLE: &str = "list-hang-notitle";

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    Text(String),
    Section(Section),
    List(List),
    Table(Table),
    /// A pre-structured fragment with no typed counterpart, kept as-is.
    Raw(serde_json::Value),
}

/// A named (or, for paragraph grouping, unnamed) block of nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub name: String,
    pub children: Vec<DocumentNode>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    pub style: Option<String>,
    pub items: Vec<ListEntry>,
}

/// An entry in a [`List`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    Text(String),
    Item(Item),
    Section(Section),
}

/// A hanging list item: `Name. Entry text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub entry: String,
}

/// A dice-roll table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub caption: Option<String>,
    pub column_labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DocumentNode {
    pub fn text(text: impl Into<String>) -> Self {
        DocumentNode::Text(text.into())
    }

    pub fn section(name: impl Into<String>, children: Vec<DocumentNode>) -> Self {
        DocumentNode::Section(Section::new(name, children))
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            DocumentNode::Text(_) => "text",
            DocumentNode::Section(_) => "entries",
            DocumentNode::List(_) => "list",
            DocumentNode::Table(_) => "table",
            DocumentNode::Raw(_) => "raw",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DocumentNode::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            DocumentNode::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            DocumentNode::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DocumentNode::Table(table) => Some(table),
            _ => None,
        }
    }
}

impl Section {
    pub fn new(name: impl Into<String>, children: Vec<DocumentNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name)
    }

    /// The section's only child, when it is a single prose line.
    pub fn single_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [DocumentNode::Text(text)] => Some(text),
            _ => None,
        }
    }
}

impl List {
    pub fn is_hanging(&self) -> bool {
        self.style.as_deref() == Some(HANGING_STYLE)
    }
}

impl ListEntry {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ListEntry::Text(text) => Some(text),
            _ => None,
        }
    }
}
