//! Markdown inline markup
//!
//!     Markdown pastes carry emphasis as `**bold**`, `*italic*`, `***both***` and `` `code` ``.
//!     The output format marks the same things with tags, so Markdown prose is rewritten before
//!     the vocabulary taggers see it:
//!
//!         `***x***` -> `{@b {@i x}}`
//!         `**x**` / `__x__` -> `{@b x}`
//!         `*x*` / `_x_` -> `{@i x}`
//!         `` `x` `` -> `{@code x}`
//!
//!     Text is tokenized with logos (see [tokens]) and paired on a frame stack (see [parser]).
//!     A delimiter only opens next to a word character and only closes after one, so intraword
//!     underscores and stray asterisks stay literal. Backslash escapes are literal, code spans
//!     are literal, and anything left unclosed at the end is put back as it was written.

pub mod nodes;
pub mod parser;
pub mod tokens;

pub use nodes::{InlineContent, InlineNode};
pub use parser::parse_inlines;

/// Rewrite Markdown emphasis and code spans as tags.
pub fn to_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    render_tags(&parse_inlines(text), &mut out);
    out
}

/// Drop all markup, keeping the text.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    render_plain(&parse_inlines(text), &mut out);
    out
}

fn render_tags(nodes: &[InlineNode], out: &mut String) {
    for node in nodes {
        match node {
            InlineNode::Plain(text) => out.push_str(text),
            InlineNode::Code(text) => {
                out.push_str("{@code ");
                out.push_str(text);
                out.push('}');
            }
            InlineNode::Strong(children) => wrap(out, "b", |out| render_tags(children, out)),
            InlineNode::Emphasis(children) => wrap(out, "i", |out| render_tags(children, out)),
            InlineNode::StrongEmphasis(children) => wrap(out, "b", |out| {
                wrap(out, "i", |out| render_tags(children, out))
            }),
        }
    }
}

fn wrap(out: &mut String, tag: &str, inner: impl FnOnce(&mut String)) {
    out.push_str("{@");
    out.push_str(tag);
    out.push(' ');
    inner(out);
    out.push('}');
}

fn render_plain(nodes: &[InlineNode], out: &mut String) {
    for node in nodes {
        match node {
            InlineNode::Plain(text) | InlineNode::Code(text) => out.push_str(text),
            InlineNode::Strong(children)
            | InlineNode::Emphasis(children)
            | InlineNode::StrongEmphasis(children) => render_plain(children, out),
        }
    }
}
