//! Inline nodes produced by the inline parser.

pub type InlineContent = Vec<InlineNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    Plain(String),
    /// `**x**` or `__x__`
    Strong(InlineContent),
    /// `*x*` or `_x_`
    Emphasis(InlineContent),
    /// `***x***`
    StrongEmphasis(InlineContent),
    /// `` `x` ``, never nested
    Code(String),
}

impl InlineNode {
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            InlineNode::Plain(text) => Some(text),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&InlineContent> {
        match self {
            InlineNode::Strong(children)
            | InlineNode::Emphasis(children)
            | InlineNode::StrongEmphasis(children) => Some(children),
            _ => None,
        }
    }
}
