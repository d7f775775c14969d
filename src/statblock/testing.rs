//! Testing utilities
//!
//!     Two tools, meant to be used together:
//!
//!         - [`Samples`]: curated sample pastes under `samples/`. Real stat block text is full
//!           of small quirks that are easy to get wrong when retyped into a test, so tests that
//!           exercise whole conversions should load a sample rather than inline one.
//!         - [`assert_entries`]: a fluent API for asserting on a `DocumentNode` tree, so a test
//!           states the shape it expects instead of matching enum variants by hand.
//!
//!     ```rust,ignore
//!     let (conversion, _) = Samples::convert("races/hill-dwarf.txt");
//!     assert_entries(&conversion.entity.entries)
//!         .item(0, |node| {
//!             node.assert_section()
//!                 .name("Dwarven Resilience")
//!                 .child_count(1);
//!         })
//!         .no_section("Size");
//!     ```

mod assertions;
mod matchers;
mod samples;

pub use assertions::{
    assert_entries, EntriesAssertion, ListAssertion, NodeAssertion, SectionAssertion,
    TableAssertion, TextAssertion,
};
pub use matchers::TextMatch;
pub use samples::Samples;
