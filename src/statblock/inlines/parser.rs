//! Inline frame-stack parser
//!
//! Each opening delimiter pushes a frame; the matching delimiter pops it into a node on the
//! parent frame. A delimiter already open further down the stack does not open again, so
//! `*outer *inner* text*` reads as one emphasis. Frames still open at the end are unwound back
//! into literal text.

use super::nodes::{InlineContent, InlineNode};
use super::tokens::{tokenize, Token};

/// Parse inline nodes from a raw string.
pub fn parse_inlines(text: &str) -> InlineContent {
    let mut parser = InlineParser::default();

    for (token, slice) in tokenize(text) {
        let start = slice.as_ptr() as usize - text.as_ptr() as usize;
        let prev = text[..start].chars().next_back();
        let next = text[start + slice.len()..].chars().next();

        match token {
            Token::Escape => {
                if parser.in_code() {
                    parser.top().push_str(slice);
                } else {
                    parser.top().push_str(&slice[1..]);
                }
            }
            Token::Text | Token::Backslash => parser.top().push_str(slice),
            delimiter_token => {
                if let Some(delimiter) = delimiter_token.delimiter() {
                    parser.delimiter(delimiter, prev, next);
                }
            }
        }
    }

    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Root,
    Strong,
    Emphasis,
    StrongEmphasis,
    Code,
}

impl FrameKind {
    fn from_delimiter(delimiter: &str) -> Self {
        match delimiter {
            "***" => FrameKind::StrongEmphasis,
            "**" | "__" => FrameKind::Strong,
            "`" => FrameKind::Code,
            _ => FrameKind::Emphasis,
        }
    }
}

#[derive(Debug)]
struct InlineFrame {
    kind: FrameKind,
    delimiter: &'static str,
    buffer: String,
    children: InlineContent,
}

impl InlineFrame {
    fn new(kind: FrameKind, delimiter: &'static str) -> Self {
        Self {
            kind,
            delimiter,
            buffer: String::new(),
            children: Vec::new(),
        }
    }

    fn has_content(&self) -> bool {
        !self.buffer.is_empty() || !self.children.is_empty()
    }

    fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        if let Some(InlineNode::Plain(existing)) = self.children.last_mut() {
            existing.push_str(&text);
        } else {
            self.children.push(InlineNode::Plain(text));
        }
    }

    fn push_node(&mut self, node: InlineNode) {
        self.flush_buffer();
        match node {
            InlineNode::Plain(text) => self.push_str(&text),
            other => self.children.push(other),
        }
    }

    /// Close this frame into a node. `Root` has no node of its own.
    fn into_node(mut self) -> Option<InlineNode> {
        self.flush_buffer();
        let children = self.children;
        match self.kind {
            FrameKind::Root => None,
            FrameKind::Strong => Some(InlineNode::Strong(children)),
            FrameKind::Emphasis => Some(InlineNode::Emphasis(children)),
            FrameKind::StrongEmphasis => Some(InlineNode::StrongEmphasis(children)),
            FrameKind::Code => Some(InlineNode::Code(flatten_literal(children))),
        }
    }
}

struct InlineParser {
    root: InlineFrame,
    stack: Vec<InlineFrame>,
    /// Delimiters that could not open because the same delimiter was already open. Their
    /// partners close nothing.
    blocked: Vec<&'static str>,
}

impl Default for InlineParser {
    fn default() -> Self {
        Self {
            root: InlineFrame::new(FrameKind::Root, ""),
            stack: Vec::new(),
            blocked: Vec::new(),
        }
    }
}

impl InlineParser {
    fn top(&mut self) -> &mut InlineFrame {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn in_code(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|frame| frame.kind == FrameKind::Code)
    }

    fn delimiter(&mut self, delimiter: &'static str, prev: Option<char>, next: Option<char>) {
        let (top_matches, has_content) = match self.stack.last() {
            Some(frame) => (frame.delimiter == delimiter, frame.has_content()),
            None => (false, false),
        };
        if top_matches {
            if self.consume_blocked(delimiter) {
                self.top().push_str(delimiter);
                return;
            }
            if has_content && is_valid_end(prev, next, delimiter) {
                if let Some(node) = self.stack.pop().and_then(InlineFrame::into_node) {
                    self.top().push_node(node);
                }
                return;
            }
        }

        if !self.in_code() && is_valid_start(prev, next) {
            if self.stack.iter().any(|frame| frame.delimiter == delimiter) {
                self.blocked.push(delimiter);
            } else {
                self.top().flush_buffer();
                self.stack.push(InlineFrame::new(
                    FrameKind::from_delimiter(delimiter),
                    delimiter,
                ));
                return;
            }
        }

        self.top().push_str(delimiter);
    }

    fn consume_blocked(&mut self, delimiter: &str) -> bool {
        match self.blocked.iter().position(|blocked| *blocked == delimiter) {
            Some(index) => {
                self.blocked.remove(index);
                true
            }
            None => false,
        }
    }

    /// Unwind unclosed frames as literal text and return the root content.
    fn finish(mut self) -> InlineContent {
        while let Some(mut frame) = self.stack.pop() {
            frame.flush_buffer();
            let parent = self.top();
            parent.push_str(frame.delimiter);
            for child in frame.children {
                parent.push_node(child);
            }
        }
        self.root.flush_buffer();
        self.root.children
    }
}

/// Code spans hold only text; any nested node is flattened back to its text.
fn flatten_literal(children: InlineContent) -> String {
    let mut text = String::new();
    for node in children {
        if let InlineNode::Plain(segment) = node {
            text.push_str(&segment);
        }
    }
    text
}

fn is_valid_start(prev: Option<char>, next: Option<char>) -> bool {
    !is_word(prev) && next.is_some_and(|ch| !ch.is_whitespace())
}

fn is_valid_end(prev: Option<char>, next: Option<char>, delimiter: &str) -> bool {
    let inside_valid = match delimiter {
        "`" => prev.is_some(),
        _ => matches!(prev, Some(ch) if !ch.is_whitespace()),
    };
    inside_valid && !is_word(next)
}

fn is_word(ch: Option<char>) -> bool {
    ch.map(|c| c.is_alphanumeric()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_text() {
        let nodes = parse_inlines("hello world");
        assert_eq!(nodes, vec![InlineNode::Plain("hello world".into())]);
    }

    #[test]
    fn parses_strong_with_nested_emphasis() {
        let nodes = parse_inlines("**strong _inner_** text");
        assert_eq!(
            nodes,
            vec![
                InlineNode::Strong(vec![
                    InlineNode::Plain("strong ".into()),
                    InlineNode::Emphasis(vec![InlineNode::Plain("inner".into())]),
                ]),
                InlineNode::Plain(" text".into()),
            ]
        );
    }

    #[test]
    fn code_is_literal() {
        let nodes = parse_inlines("`a * literal _` text");
        assert_eq!(
            nodes,
            vec![
                InlineNode::Code("a * literal _".into()),
                InlineNode::Plain(" text".into()),
            ]
        );
    }

    #[test]
    fn unmatched_nested_preserves_children() {
        let nodes = parse_inlines("*a _b_ c");
        assert_eq!(
            nodes,
            vec![
                InlineNode::Plain("*a ".into()),
                InlineNode::Emphasis(vec![InlineNode::Plain("b".into())]),
                InlineNode::Plain(" c".into()),
            ]
        );
    }

    #[test]
    fn same_delimiter_nesting_skips_inner_pair() {
        let nodes = parse_inlines("*outer *inner* text*");
        assert_eq!(
            nodes,
            vec![InlineNode::Emphasis(vec![InlineNode::Plain(
                "outer *inner* text".into()
            )])]
        );
    }

    #[test]
    fn empty_pair_is_literal() {
        assert_eq!(parse_inlines("****"), vec![InlineNode::Plain("****".into())]);
    }

    #[test]
    fn punctuation_before_closing_delimiter() {
        let nodes = parse_inlines("**Darkvision.** You see.");
        assert_eq!(
            nodes[0],
            InlineNode::Strong(vec![InlineNode::Plain("Darkvision.".into())])
        );
    }
}
