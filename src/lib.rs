//! # statblock-parser
//!
//! Converts pasted stat block text (plain text or Markdown) into structured entity records.
//!
//! File Layout
//!
//! The conversion runs as a strict forward pipeline, one module per stage:
//!
//! src/statblock
//!   ├── normalizing   Repairs line-wrap artifacts before any structure is inferred
//!   ├── lexing        Pure line predicates (list item, title, inline heading, continuation)
//!   ├── building      Line-by-line document builders (plain text and Markdown)
//!   ├── tagging       Tag-aware rewriting of prose into `{@tag ...}` markers
//!   ├── extraction    Promotes recognized sections into typed entity fields
//!   ├── pipeline      Ties the stages together behind `Converter`
//!   └── config        Layered TOML configuration feeding `ConvertOptions`
//!
//! For testing guidelines, see the [testing module](statblock::testing).

#![allow(rustdoc::invalid_html_tags)]

pub mod statblock;
