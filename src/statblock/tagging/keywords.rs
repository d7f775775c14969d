//! Skill, sense and action tagging
//!
//! Plain word-list matches. Skills and actions are matched case-sensitively since both are
//! capitalized in rules text ("a Wisdom (Perception) check", "take the Dash action") and their
//! lower-case forms are ordinary English. Senses are matched in any case.
//!
//! Actions skip text that is itself in title case, which is heading text rather than prose, and
//! undo the tag in compounds such as "Extra Attack" where "Attack" is not the action.

use super::{CategoryTagger, TagKind, TagMatch};
use crate::statblock::text::is_title_case;
use crate::statblock::vocabulary::{ACTIONS, SENSES, SKILLS};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static ATTACK_COMPOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(Extra|Sneak|Weapon|Spell|Breath|Opportunity) \{@action Attack\}").unwrap()
});

fn word_list(words: &[&str], case_insensitive: bool) -> Result<Regex, regex::Error> {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = sorted
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
        .case_insensitive(case_insensitive)
        .build()
}

fn find_all(pattern: &Regex, kind: TagKind, text: &str) -> Vec<TagMatch> {
    pattern
        .find_iter(text)
        .map(|found| TagMatch {
            span: found.range(),
            kind,
            replacement: kind.marker(found.as_str()),
        })
        .collect()
}

pub struct SkillTagger {
    pattern: Regex,
}

impl SkillTagger {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: word_list(SKILLS, false)?,
        })
    }
}

impl CategoryTagger for SkillTagger {
    fn name(&self) -> &str {
        "skills"
    }

    fn matches(&self, text: &str) -> Vec<TagMatch> {
        find_all(&self.pattern, TagKind::Skill, text)
    }
}

pub struct SenseTagger {
    pattern: Regex,
}

impl SenseTagger {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: word_list(SENSES, true)?,
        })
    }
}

impl CategoryTagger for SenseTagger {
    fn name(&self) -> &str {
        "senses"
    }

    fn matches(&self, text: &str) -> Vec<TagMatch> {
        find_all(&self.pattern, TagKind::Sense, text)
    }
}

pub struct ActionTagger {
    pattern: Regex,
}

impl ActionTagger {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: word_list(ACTIONS, false)?,
        })
    }
}

impl CategoryTagger for ActionTagger {
    fn name(&self) -> &str {
        "actions"
    }

    fn matches(&self, text: &str) -> Vec<TagMatch> {
        let trimmed = text.trim();
        if trimmed.chars().any(char::is_alphabetic) && is_title_case(trimmed) {
            return Vec::new();
        }
        find_all(&self.pattern, TagKind::Action, text)
    }

    fn post_process(&self, text: String) -> String {
        ATTACK_COMPOUND.replace_all(&text, "$1 Attack").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{apply_matches, rewrite, REFERENCE_TAGS};
    use super::*;

    fn tag(tagger: &dyn CategoryTagger, text: &str) -> String {
        let out = rewrite(text, REFERENCE_TAGS, &mut |plain: &str| {
            apply_matches(plain, &tagger.matches(plain))
        });
        tagger.post_process(out)
    }

    #[test]
    fn test_skills_are_case_sensitive() {
        let tagger = SkillTagger::new().unwrap();
        assert_eq!(
            tag(&tagger, "a Dexterity (Sleight of Hand) check"),
            "a Dexterity ({@skill Sleight of Hand}) check"
        );
        assert_eq!(tag(&tagger, "the history of the land"), "the history of the land");
    }

    #[test]
    fn test_senses_any_case() {
        let tagger = SenseTagger::new().unwrap();
        assert_eq!(
            tag(&tagger, "Darkvision and tremorsense"),
            "{@sense Darkvision} and {@sense tremorsense}"
        );
    }

    #[test]
    fn test_actions() {
        let tagger = ActionTagger::new().unwrap();
        assert_eq!(
            tag(&tagger, "You can take the Dash or Use an Object action."),
            "You can take the {@action Dash} or {@action Use an Object} action."
        );
    }

    #[test]
    fn test_actions_skip_title_text() {
        let tagger = ActionTagger::new().unwrap();
        assert_eq!(tag(&tagger, "Cunning Dash"), "Cunning Dash");
    }

    #[test]
    fn test_attack_compounds_are_untagged() {
        let tagger = ActionTagger::new().unwrap();
        assert_eq!(
            tag(&tagger, "You gain the Extra Attack feature, or take the Attack action."),
            "You gain the Extra Attack feature, or take the {@action Attack} action."
        );
    }
}
