//! Continuation lines
//!
//! Line wrapping that survives normalization is caught here, once the builder knows what the
//! previous entry was. A line continues the previous entry when that entry is visibly
//! unterminated, or when the line itself opens in a way a new paragraph never does.
//!
//! These rules come from real pasted text and each one has its own false positives, so every
//! rule can be switched off on its own. The list is expected to grow with new samples.

use crate::statblock::lexing::line_classification::{is_blank, is_list_item};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static SPELL_SLOT_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:cantrips|\d+(?:st|nd|rd|th)[- ]level)(?:\s+\([^)]*\))?\s*:").unwrap()
});

static ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:st|nd|rd|th)\b").unwrap());

static ORDINAL_LEVEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d+(?:st|nd|rd|th)[- ]level\b").unwrap());

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s+").unwrap());

static NUMBER_LEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\d+\s+level\b").unwrap());

static ABILITY_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Strength|Dexterity|Constitution|Intelligence|Wisdom|Charisma)\s").unwrap()
});

static SAVING_THROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:saving throws?\b|(?:str|dex|con|int|wis|cha)\.?\s+sav(?:e|ing throw)\b)")
        .unwrap()
});

static HIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Hit:").unwrap());

static SPELLCASTING_ABILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:its|their|your|the \w+'s)\s+)?spellcasting ability\b").unwrap()
});

static DC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^DC \d").unwrap());

/// Per-rule switches for [`is_continuation_line`]. All rules are on by default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContinuationRules {
    pub lowercase: bool,
    pub ordinal: bool,
    pub number: bool,
    pub parenthesis: bool,
    pub ability_name: bool,
    pub saving_throw: bool,
    pub hit: bool,
    pub spellcasting_ability: bool,
    pub dc: bool,
}

impl Default for ContinuationRules {
    fn default() -> Self {
        Self {
            lowercase: true,
            ordinal: true,
            number: true,
            parenthesis: true,
            ability_name: true,
            saving_throw: true,
            hit: true,
            spellcasting_ability: true,
            dc: true,
        }
    }
}

/// Does `line` continue `previous`, the last text entry in the current scope?
pub fn is_continuation_line(
    previous: Option<&str>,
    line: &str,
    rules: &ContinuationRules,
) -> bool {
    let line = line.trim();
    let previous = match previous {
        Some(previous) => previous.trim_end(),
        None => return false,
    };
    if is_blank(line) || is_list_item(line, false) || SPELL_SLOT_HEADING.is_match(line) {
        return false;
    }

    if is_unterminated(previous) {
        log::trace!("continuation after unterminated entry: {:?}", line);
        return true;
    }

    let first = match line.chars().next() {
        Some(first) => first,
        None => return false,
    };

    (rules.lowercase && first.is_lowercase())
        || (rules.ordinal && ORDINAL.is_match(line) && !ORDINAL_LEVEL.is_match(line))
        || (rules.number && NUMBER.is_match(line) && !NUMBER_LEVEL.is_match(line))
        || (rules.parenthesis && first == '(')
        || (rules.ability_name && ABILITY_NAME.is_match(line))
        || (rules.saving_throw && SAVING_THROW.is_match(line))
        || (rules.hit && HIT.is_match(line))
        || (rules.spellcasting_ability && SPELLCASTING_ABILITY.is_match(line))
        || (rules.dc && DC.is_match(line))
}

fn is_unterminated(previous: &str) -> bool {
    previous.ends_with([',', '-', '\u{2014}', '\u{2013}'])
        || previous.ends_with(" and")
        || previous.ends_with(" or")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn continues(previous: &str, line: &str) -> bool {
        is_continuation_line(Some(previous), line, &ContinuationRules::default())
    }

    #[test]
    fn test_no_previous_entry() {
        assert!(!is_continuation_line(
            None,
            "lower case",
            &ContinuationRules::default()
        ));
    }

    #[test]
    fn test_unterminated_previous_entry() {
        assert!(continues("You can speak Common,", "Elvish"));
        assert!(continues("Choose Elvish or", "Dwarvish."));
        assert!(continues("Choose one \u{2014}", "Fire."));
        assert!(!continues("You can speak Common.", "Elvish."));
    }

    #[test]
    fn test_lowercase_start() {
        assert!(continues("The ogre swings", "wildly."));
        let rules = ContinuationRules {
            lowercase: false,
            ..Default::default()
        };
        assert!(!is_continuation_line(Some("The ogre swings"), "wildly.", &rules));
    }

    #[test]
    fn test_ordinal_but_not_spell_level() {
        assert!(continues("It can cast", "3rd-circle magic."));
        assert!(!continues("It can cast.", "3rd-level spells are harder."));
        assert!(!continues("Spells.", "1st level (4 slots): shield"));
    }

    #[test]
    fn test_number_fragment() {
        assert!(continues("Hit: 7", "(1d8 + 3) piercing damage."));
        assert!(continues("It deals", "14 damage."));
        assert!(!continues("It is.", "5 level advancement."));
    }

    #[test]
    fn test_ability_and_saving_throw() {
        assert!(continues("The target makes a", "Dexterity saving throw."));
        assert!(continues("Targets make", "saving throws against it."));
        assert!(continues("Targets make.", "DEX save or fall."));
    }

    #[test]
    fn test_hit_dc_and_spellcasting() {
        assert!(continues("Melee Weapon Attack: +5 to hit.", "Hit: 7 damage."));
        assert!(continues("It must succeed.", "DC 13 Wisdom saving throw."));
        assert!(continues(
            "The elf casts spells.",
            "Its spellcasting ability is Wisdom."
        ));
    }

    #[test]
    fn test_list_items_and_headings_never_continue() {
        assert!(!continues("Choose one,", "• Elvish"));
        assert!(!continues("Choose one,", "Cantrips (at will): light"));
        assert!(!continues("The ogre swings", "Size"));
    }
}
