//! Text matching for assertions
//!
//! Converted prose carries `{@tag ...}` markers, so besides plain comparisons a matcher can
//! compare only the reader-visible text, or require a particular tag to be present.

use crate::statblock::tagging::{split_by_tags, strip_tags, Segment};

#[derive(Debug, Clone)]
pub enum TextMatch {
    Exact(String),
    StartsWith(String),
    Contains(String),
    /// Equal once every tag is replaced by its display text.
    Prose(String),
    /// Holds at least one `{@name ...}` tag, at any nesting depth.
    HasTag(String),
}

impl TextMatch {
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            TextMatch::Exact(expected) => actual == expected,
            TextMatch::StartsWith(prefix) => actual.starts_with(prefix.as_str()),
            TextMatch::Contains(substring) => actual.contains(substring.as_str()),
            TextMatch::Prose(expected) => strip_tags(actual) == *expected,
            TextMatch::HasTag(name) => has_tag(actual, name),
        }
    }

    /// Panic with `context` unless `actual` matches.
    pub fn assert(&self, actual: &str, context: &str) {
        if !self.matches(actual) {
            panic!("{}: Expected {}, but got '{}'", context, self.describe(), actual);
        }
    }

    fn describe(&self) -> String {
        match self {
            TextMatch::Exact(expected) => format!("text '{}'", expected),
            TextMatch::StartsWith(prefix) => format!("text starting with '{}'", prefix),
            TextMatch::Contains(substring) => format!("text containing '{}'", substring),
            TextMatch::Prose(expected) => format!("text reading '{}' without tags", expected),
            TextMatch::HasTag(name) => format!("a {{@{}}} tag", name),
        }
    }
}

fn has_tag(text: &str, wanted: &str) -> bool {
    split_by_tags(text).into_iter().any(|segment| match segment {
        Segment::Tag { name, body, .. } => name == wanted || has_tag(body, wanted),
        Segment::Plain(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_ignores_tags() {
        let text = "You are {@condition prone} and take {@damage 1d6} damage.";
        assert!(TextMatch::Prose("You are prone and take 1d6 damage.".to_string()).matches(text));
        assert!(!TextMatch::Exact("You are prone and take 1d6 damage.".to_string()).matches(text));
    }

    #[test]
    fn test_has_tag_looks_inside_nested_tags() {
        let text = "knocked {@b {@condition dazed|MyBrew}}";
        assert!(TextMatch::HasTag("condition".to_string()).matches(text));
        assert!(TextMatch::HasTag("b".to_string()).matches(text));
        assert!(!TextMatch::HasTag("dice".to_string()).matches(text));
    }

    #[test]
    #[should_panic(expected = "entries[0]: Expected a {@sense} tag")]
    fn test_failure_names_the_context() {
        TextMatch::HasTag("sense".to_string()).assert("plain words", "entries[0]");
    }
}
