//! Hanging-list cleanup
//!
//! A list built from bullets is only marked hanging while it is being built if one of its
//! items was already split into `{name, entry}`. After the pass, an unstyled list whose every
//! item reads as an inline heading is converted as a whole.

use crate::statblock::ast::{DocumentNode, Item, List, ListEntry, HANGING_STYLE};
use crate::statblock::lexing::split_name_line;

/// Convert eligible lists anywhere in the tree. Returns the number of lists converted.
pub fn convert_hanging_lists(nodes: &mut [DocumentNode]) -> usize {
    let mut converted = 0;
    for node in nodes {
        match node {
            DocumentNode::Section(section) => {
                converted += convert_hanging_lists(&mut section.children)
            }
            DocumentNode::List(list) => {
                for entry in &mut list.items {
                    if let ListEntry::Section(section) = entry {
                        converted += convert_hanging_lists(&mut section.children);
                    }
                }
                if convert_list(list) {
                    converted += 1;
                }
            }
            _ => {}
        }
    }
    converted
}

fn convert_list(list: &mut List) -> bool {
    if list.style.is_some() || list.items.is_empty() {
        return false;
    }
    let items: Option<Vec<Item>> = list
        .items
        .iter()
        .map(|entry| {
            let split = split_name_line(entry.as_text()?)?;
            Some(Item {
                name: split.name,
                entry: split.entry,
            })
        })
        .collect();
    match items {
        Some(items) => {
            list.items = items.into_iter().map(ListEntry::Item).collect();
            list.style = Some(HANGING_STYLE.to_string());
            true
        }
        None => false,
    }
}
