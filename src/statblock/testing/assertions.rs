//! Fluent assertion API for document trees

use super::matchers::TextMatch;
use crate::statblock::ast::{DocumentNode, List, ListEntry, Section, Table};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a list of entries.
pub fn assert_entries(entries: &[DocumentNode]) -> EntriesAssertion<'_> {
    EntriesAssertion {
        entries,
        context: "entries".to_string(),
    }
}

fn summarize(nodes: &[DocumentNode]) -> String {
    nodes
        .iter()
        .map(|node| match node {
            DocumentNode::Section(section) => format!("entries({:?})", section.name),
            other => other.node_type().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Entries Assertions
// ============================================================================

pub struct EntriesAssertion<'a> {
    entries: &'a [DocumentNode],
    context: String,
}

impl<'a> EntriesAssertion<'a> {
    pub fn count(self, expected: usize) -> Self {
        let actual = self.entries.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} entries, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(self.entries)
        );
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        assert!(
            index < self.entries.len(),
            "{}: Entry index {} out of bounds ({} entries)",
            self.context,
            index,
            self.entries.len()
        );
        assertion(NodeAssertion {
            node: &self.entries[index],
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Assert no section with this name exists at this level.
    pub fn no_section(self, name: &str) -> Self {
        let found = self
            .entries
            .iter()
            .filter_map(DocumentNode::as_section)
            .any(|section| section.is_named(name));
        assert!(
            !found,
            "{}: Expected no section named '{}': [{}]",
            self.context,
            name,
            summarize(self.entries)
        );
        self
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    node: &'a DocumentNode,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    fn wrong_type(&self, expected: &str) -> ! {
        panic!(
            "{}: Expected {}, but found {}",
            self.context,
            expected,
            self.node.node_type()
        )
    }

    pub fn assert_text(self) -> TextAssertion<'a> {
        match self.node {
            DocumentNode::Text(text) => TextAssertion {
                text,
                context: self.context,
            },
            _ => self.wrong_type("text"),
        }
    }

    pub fn assert_section(self) -> SectionAssertion<'a> {
        match self.node {
            DocumentNode::Section(section) => SectionAssertion {
                section,
                context: self.context,
            },
            _ => self.wrong_type("entries"),
        }
    }

    pub fn assert_list(self) -> ListAssertion<'a> {
        match self.node {
            DocumentNode::List(list) => ListAssertion {
                list,
                context: self.context,
            },
            _ => self.wrong_type("list"),
        }
    }

    pub fn assert_table(self) -> TableAssertion<'a> {
        match self.node {
            DocumentNode::Table(table) => TableAssertion {
                table,
                context: self.context,
            },
            _ => self.wrong_type("table"),
        }
    }
}

// ============================================================================
// Text Assertions
// ============================================================================

pub struct TextAssertion<'a> {
    text: &'a str,
    context: String,
}

impl TextAssertion<'_> {
    pub fn text(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(self.text, &self.context);
        self
    }
    pub fn text_starts_with(self, prefix: &str) -> Self {
        TextMatch::StartsWith(prefix.to_string()).assert(self.text, &self.context);
        self
    }
    pub fn text_contains(self, substring: &str) -> Self {
        TextMatch::Contains(substring.to_string()).assert(self.text, &self.context);
        self
    }
    /// Compare the text as a reader sees it, with tags replaced by their display text.
    pub fn prose(self, expected: &str) -> Self {
        TextMatch::Prose(expected.to_string()).assert(self.text, &self.context);
        self
    }
    pub fn has_tag(self, name: &str) -> Self {
        TextMatch::HasTag(name.to_string()).assert(self.text, &self.context);
        self
    }
}

// ============================================================================
// Section Assertions
// ============================================================================

pub struct SectionAssertion<'a> {
    section: &'a Section,
    context: String,
}

impl<'a> SectionAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        TextMatch::Exact(expected.to_string()).assert(&self.section.name, &self.context);
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.section.children.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.section.children)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = &self.section.children;
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds (section has {} children)",
            self.context,
            index,
            children.len()
        );
        assertion(NodeAssertion {
            node: &children[index],
            context: format!("{}:children[{}]", self.context, index),
        });
        self
    }

    /// Shorthand for a child that is a prose string.
    pub fn child_text(self, index: usize, expected: &str) -> Self {
        self.child(index, |child| {
            child.assert_text().text(expected);
        })
    }
}

// ============================================================================
// List Assertions
// ============================================================================

pub struct ListAssertion<'a> {
    list: &'a List,
    context: String,
}

impl<'a> ListAssertion<'a> {
    pub fn item_count(self, expected: usize) -> Self {
        let actual = self.list.items.len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} list items, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn hanging(self) -> Self {
        assert!(
            self.list.is_hanging(),
            "{}: Expected a hanging list, found style {:?}",
            self.context,
            self.list.style
        );
        self
    }

    pub fn unstyled(self) -> Self {
        assert!(
            self.list.style.is_none(),
            "{}: Expected no list style, found {:?}",
            self.context,
            self.list.style
        );
        self
    }

    fn entry(&self, index: usize) -> &'a ListEntry {
        assert!(
            index < self.list.items.len(),
            "{}: List item index {} out of bounds ({} items)",
            self.context,
            index,
            self.list.items.len()
        );
        &self.list.items[index]
    }

    /// Assert a plain string item.
    pub fn text_item(self, index: usize, expected: &str) -> Self {
        match self.entry(index) {
            ListEntry::Text(text) => TextMatch::Exact(expected.to_string())
                .assert(text, &format!("{}:items[{}]", self.context, index)),
            other => panic!(
                "{}:items[{}]: Expected a string item, found {:?}",
                self.context, index, other
            ),
        }
        self
    }

    /// Assert a `{name, entry}` item.
    pub fn named_item(self, index: usize, name: &str, entry: &str) -> Self {
        match self.entry(index) {
            ListEntry::Item(item) => {
                let context = format!("{}:items[{}]", self.context, index);
                TextMatch::Exact(name.to_string()).assert(&item.name, &context);
                TextMatch::Exact(entry.to_string()).assert(&item.entry, &context);
            }
            other => panic!(
                "{}:items[{}]: Expected a named item, found {:?}",
                self.context, index, other
            ),
        }
        self
    }

    /// Assert on an item that is a section.
    pub fn section_item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(SectionAssertion<'a>),
    {
        match self.entry(index) {
            ListEntry::Section(section) => assertion(SectionAssertion {
                section,
                context: format!("{}:items[{}]", self.context, index),
            }),
            other => panic!(
                "{}:items[{}]: Expected a section item, found {:?}",
                self.context, index, other
            ),
        }
        self
    }
}

// ============================================================================
// Table Assertions
// ============================================================================

pub struct TableAssertion<'a> {
    table: &'a Table,
    context: String,
}

impl TableAssertion<'_> {
    pub fn caption(self, expected: Option<&str>) -> Self {
        assert_eq!(
            self.table.caption.as_deref(),
            expected,
            "{}: caption mismatch",
            self.context
        );
        self
    }

    pub fn column_labels(self, expected: &[&str]) -> Self {
        assert_eq!(
            self.table.column_labels, expected,
            "{}: column labels mismatch",
            self.context
        );
        self
    }

    pub fn row(self, index: usize, expected: &[&str]) -> Self {
        let row = self.table.rows.get(index).unwrap_or_else(|| {
            panic!(
                "{}: Row index {} out of bounds ({} rows)",
                self.context,
                index,
                self.table.rows.len()
            )
        });
        assert_eq!(row, expected, "{}: row {} mismatch", self.context, index);
        self
    }

    pub fn row_count(self, expected: usize) -> Self {
        assert_eq!(
            self.table.rows.len(),
            expected,
            "{}: row count mismatch",
            self.context
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statblock::ast::Item;

    #[test]
    fn test_fluent_assertions() {
        let entries = vec![
            DocumentNode::section("Traits", vec![DocumentNode::text("Brave.")]),
            DocumentNode::List(List {
                style: Some(crate::statblock::ast::HANGING_STYLE.to_string()),
                items: vec![ListEntry::Item(Item {
                    name: "Bite".into(),
                    entry: "Ouch.".into(),
                })],
            }),
        ];
        assert_entries(&entries)
            .count(2)
            .item(0, |node| {
                node.assert_section().name("Traits").child_text(0, "Brave.");
            })
            .item(1, |node| {
                node.assert_list().hanging().named_item(0, "Bite", "Ouch.");
            })
            .no_section("Size");
    }

    #[test]
    #[should_panic(expected = "Expected list")]
    fn test_wrong_type_panics() {
        let entries = vec![DocumentNode::text("x")];
        assert_entries(&entries).item(0, |node| {
            node.assert_list();
        });
    }
}
