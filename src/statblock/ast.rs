//! Document tree
//!
//!     The builders produce a tree of [`DocumentNode`]s: prose leaves, named sections, lists,
//!     dice tables, and pre-structured JSON fragments spliced in verbatim.
//!
//!     A list never directly holds another list. The item type [`ListEntry`] has no list
//!     variant, so a nested list has to be wrapped in an unnamed section.
//!
//!     Serialization produces plain nested arrays and objects with a `type` discriminator on
//!     every non-leaf node (`"entries"`, `"list"`, `"item"`, `"table"`). Leaves are bare strings.

pub mod nodes;
pub mod serialize;
pub mod walk;

pub use nodes::{DocumentNode, Item, List, ListEntry, Section, Table, HANGING_STYLE};
pub use serialize::from_json;
pub use walk::{count_nodes, for_each_text, map_text, walk, Visitor};
