//! Inflicted-condition scanner
//!
//!     Mentioning a condition is not the same as inflicting it: "while the dragon is
//!     frightened" says nothing about what the dragon does to others, while "must succeed on a
//!     DC 13 Wisdom saving throw or be frightened" does. This scanner looks for the narrative
//!     phrasings of the second kind and reports the canonical condition names they name.
//!
//!     Each pattern holds a `{c}` placeholder that is replaced by the condition alternation.
//!     Patterns run over tag-stripped text, so `{@condition prone}` reads as "prone". The text
//!     is never changed.

use super::engine::strip_tags;
use crate::statblock::ast::{for_each_text, DocumentNode};
use crate::statblock::vocabulary::Vocabulary;
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, BTreeSet};

const PATTERNS: &[&str] = &[
    r"\bor be(?:come)? (?:\w+ )?{c}\b",
    r"\bor (?:fall|falls|drop|drops) {c}\b",
    r"\bknock(?:s|ed|ing)? (?:\w+ ){0,3}{c}\b",
    r"\b(?:is|are|becomes?) {c} (?:until|for|by|while)\b",
    r"\b{c} \(escape DC",
    r"\blevels? of {c}\b",
    r"\bfalls? {c}\b",
    r"\bthe target is {c}\b",
    r"\bmagically {c}\b",
    r"\b(?:causes?|causing|forces?|forcing) (?:\w+ ){0,4}to (?:be|become|fall) {c}\b",
    r"\b(?:target|creature) (?:is|becomes) {c}\b",
    r"\bbecomes? {c}\b",
    r"\b(?:gains?|suffers?) (?:\w+ )?levels? of {c}\b",
    r"\band (?:is|are) {c}\b",
    r"\b(?:is|are) also {c}\b",
    r"\b(?:is|are) {c} and\b",
    r"\bha(?:s|ve) the {c} condition\b",
    r"\b(?:it|they) (?:is|are) {c}\b",
    r"\b(?:is|are) left {c}\b",
    r"\b{c} on a failed save\b",
    r"\bsaving throw or (?:be|become) (?:\w+ ){0,2}{c}\b",
    r"\bthe {c} condition (?:on|to) (?:the )?(?:target|creature)\b",
    r"\b(?:is|are) {c} for (?:1|one) (?:minute|hour|round)\b",
    r"\bpulled {c}\b",
    r"\b(?:is|are) grappled by\b",
    r"\bstunned until\b",
    r"\bimpose the {c} condition\b",
    r"\b{c} \(save ends\)",
];

/// Detects conditions a creature inflicts, as opposed to merely mentions.
pub struct InflictedScanner {
    patterns: Vec<Regex>,
    /// Lower-cased condition name to its canonical spelling.
    canonical: BTreeMap<String, String>,
}

impl InflictedScanner {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, regex::Error> {
        let mut names: Vec<&str> = vocabulary.condition_names().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        let alternation = format!(
            "(?P<c>{})",
            names
                .iter()
                .map(|name| regex::escape(name))
                .collect::<Vec<_>>()
                .join("|")
        );

        let patterns = PATTERNS
            .iter()
            .map(|pattern| {
                RegexBuilder::new(&pattern.replace("{c}", &alternation))
                    .case_insensitive(true)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let canonical = names
            .iter()
            .map(|name| (name.to_lowercase(), name.to_string()))
            .collect();

        Ok(Self {
            patterns,
            canonical,
        })
    }

    /// Conditions one string inflicts.
    pub fn scan(&self, text: &str) -> BTreeSet<String> {
        let plain = strip_tags(text);
        let mut found = BTreeSet::new();
        for pattern in &self.patterns {
            for caps in pattern.captures_iter(&plain) {
                let name = match caps.name("c") {
                    Some(matched) => matched.as_str().to_lowercase(),
                    // Patterns without a placeholder name their condition outright.
                    None => fixed_condition(caps.get(0).map_or("", |m| m.as_str())),
                };
                if let Some(canonical) = self.canonical.get(&name) {
                    found.insert(canonical.clone());
                }
            }
        }
        found
    }

    /// Conditions inflicted anywhere in a document, limited to `allow` when given.
    pub fn scan_nodes(
        &self,
        nodes: &[DocumentNode],
        allow: Option<&BTreeSet<String>>,
    ) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for_each_text(nodes, |text| found.extend(self.scan(text)));
        if let Some(allow) = allow {
            found.retain(|name| allow.iter().any(|allowed| allowed.eq_ignore_ascii_case(name)));
        }
        log::debug!("inflicted conditions: {:?}", found);
        found
    }
}

fn fixed_condition(matched: &str) -> String {
    let lower = matched.to_lowercase();
    if lower.starts_with("stunned") {
        "stunned".to_string()
    } else if lower.contains("grappled") {
        "grappled".to_string()
    } else {
        String::new()
    }
}
