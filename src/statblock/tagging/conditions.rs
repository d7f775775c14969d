//! Condition and concentration tagging
//!
//! Condition names come from the [`Vocabulary`], so homebrew conditions are tagged alongside the
//! built-in ones. A condition from a source other than the default carries it as a suffix:
//! `{@condition dazed|MyBrew}`.

use super::{CategoryTagger, TagKind, TagMatch};
use crate::statblock::vocabulary::{Vocabulary, DEFAULT_CONDITION_SOURCE};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

pub struct ConditionTagger {
    pattern: Regex,
    /// Lower-cased condition name to its source.
    sources: BTreeMap<String, String>,
}

impl ConditionTagger {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, regex::Error> {
        let mut names: Vec<&str> = vocabulary.condition_names().collect();
        // Longest first so "exhaustion" beats a homebrew "exhaust".
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

        let alternation = names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!(
            r"\b(?:(?P<status>concentration|concentrating)|(?P<condition>{}))\b",
            alternation
        ))
        .case_insensitive(true)
        .build()?;

        let sources = names
            .iter()
            .filter_map(|name| {
                vocabulary
                    .condition_source(name)
                    .map(|source| (name.to_lowercase(), source.to_string()))
            })
            .collect();

        Ok(Self { pattern, sources })
    }

    fn condition_marker(&self, text: &str) -> String {
        match self.sources.get(&text.to_lowercase()) {
            Some(source) if source != DEFAULT_CONDITION_SOURCE => {
                TagKind::Condition.marker(&format!("{}|{}", text, source))
            }
            _ => TagKind::Condition.marker(text),
        }
    }
}

fn status_marker(text: &str) -> String {
    if text.eq_ignore_ascii_case("concentration") {
        TagKind::Status.marker(text)
    } else {
        TagKind::Status.marker(&format!("concentration||{}", text))
    }
}

impl CategoryTagger for ConditionTagger {
    fn name(&self) -> &str {
        "conditions"
    }

    fn matches(&self, text: &str) -> Vec<TagMatch> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                if let Some(status) = caps.name("status") {
                    return Some(TagMatch {
                        span: status.range(),
                        kind: TagKind::Status,
                        replacement: status_marker(status.as_str()),
                    });
                }
                let condition = caps.name("condition")?;
                Some(TagMatch {
                    span: condition.range(),
                    kind: TagKind::Condition,
                    replacement: self.condition_marker(condition.as_str()),
                })
            })
            .collect()
    }
}
