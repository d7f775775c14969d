//! JSON shape of the document tree
//!
//! | node | JSON |
//! |---|---|
//! | `Text` | `"text"` |
//! | `Section` | `{"type": "entries", "name"?, "entries": [...]}` |
//! | `List` | `{"type": "list", "style"?, "items": [...]}` |
//! | `Item` | `{"type": "item", "name", "entry"}` |
//! | `Table` | `{"type": "table", "caption"?, "colLabels", "rows"}` |
//!
//! Reading JSON back ([`from_json`]) is lenient: anything that does not fit one of the typed
//! shapes is kept as [`DocumentNode::Raw`].

use super::nodes::{DocumentNode, Item, List, ListEntry, Section, Table};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

impl Serialize for DocumentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocumentNode::Text(text) => serializer.serialize_str(text),
            DocumentNode::Section(section) => section.serialize(serializer),
            DocumentNode::List(list) => list.serialize(serializer),
            DocumentNode::Table(table) => table.serialize(serializer),
            DocumentNode::Raw(value) => value.serialize(serializer),
        }
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "entries")?;
        if !self.name.is_empty() {
            map.serialize_entry("name", &self.name)?;
        }
        map.serialize_entry("entries", &self.children)?;
        map.end()
    }
}

impl Serialize for List {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "list")?;
        if let Some(style) = &self.style {
            map.serialize_entry("style", style)?;
        }
        map.serialize_entry("items", &self.items)?;
        map.end()
    }
}

impl Serialize for ListEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ListEntry::Text(text) => serializer.serialize_str(text),
            ListEntry::Item(item) => item.serialize(serializer),
            ListEntry::Section(section) => section.serialize(serializer),
        }
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "item")?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("entry", &self.entry)?;
        map.end()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "table")?;
        if let Some(caption) = &self.caption {
            map.serialize_entry("caption", caption)?;
        }
        map.serialize_entry("colLabels", &self.column_labels)?;
        map.serialize_entry("rows", &self.rows)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for DocumentNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(from_json)
    }
}

/// Convert a JSON value into a document node.
pub fn from_json(value: Value) -> DocumentNode {
    match value {
        Value::String(text) => DocumentNode::Text(text),
        value @ Value::Object(_) => {
            let typed = match value.get("type").and_then(Value::as_str) {
                Some("entries") => section_from_json(&value).map(DocumentNode::Section),
                Some("list") => list_from_json(&value).map(DocumentNode::List),
                Some("table") => table_from_json(&value).map(DocumentNode::Table),
                _ => None,
            };
            typed.unwrap_or(DocumentNode::Raw(value))
        }
        other => DocumentNode::Raw(other),
    }
}

fn section_from_json(value: &Value) -> Option<Section> {
    let name = match value.get("name") {
        Some(name) => name.as_str()?.to_string(),
        None => String::new(),
    };
    let children = value
        .get("entries")?
        .as_array()?
        .iter()
        .cloned()
        .map(from_json)
        .collect();
    Some(Section { name, children })
}

fn list_from_json(value: &Value) -> Option<List> {
    let style = match value.get("style") {
        Some(style) => Some(style.as_str()?.to_string()),
        None => None,
    };
    let items = value
        .get("items")?
        .as_array()?
        .iter()
        .map(list_entry_from_json)
        .collect::<Option<Vec<_>>>()?;
    Some(List { style, items })
}

fn list_entry_from_json(value: &Value) -> Option<ListEntry> {
    match value {
        Value::String(text) => Some(ListEntry::Text(text.clone())),
        Value::Object(object) => match object.get("type").and_then(Value::as_str)? {
            "item" => Some(ListEntry::Item(Item {
                name: object.get("name")?.as_str()?.to_string(),
                entry: object.get("entry")?.as_str()?.to_string(),
            })),
            "entries" => section_from_json(value).map(ListEntry::Section),
            _ => None,
        },
        _ => None,
    }
}

fn table_from_json(value: &Value) -> Option<Table> {
    let caption = match value.get("caption") {
        Some(caption) => Some(caption.as_str()?.to_string()),
        None => None,
    };
    let column_labels = strings(value.get("colLabels")?)?;
    let rows = value
        .get("rows")?
        .as_array()?
        .iter()
        .map(strings)
        .collect::<Option<Vec<_>>>()?;
    Some(Table {
        caption,
        column_labels,
        rows,
    })
}

fn strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|cell| cell.as_str().map(str::to_string))
        .collect()
}
