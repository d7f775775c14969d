//! Domain vocabulary tables
//!
//! Fixed word lists consumed by the line classifier, the taggers and the extractors. The only
//! extendable table is the condition vocabulary: homebrew documents may contribute their own
//! condition names, each tagged with the source that defines it.

use std::collections::BTreeMap;

/// Source of the built-in conditions; markers for these omit the `|source` suffix.
pub const DEFAULT_CONDITION_SOURCE: &str = "PHB";

/// Ability score abbreviations and full names.
pub const ABILITIES: &[(&str, &str)] = &[
    ("str", "Strength"),
    ("dex", "Dexterity"),
    ("con", "Constitution"),
    ("int", "Intelligence"),
    ("wis", "Wisdom"),
    ("cha", "Charisma"),
];

/// Built-in conditions.
pub const CONDITIONS: &[&str] = &[
    "blinded",
    "charmed",
    "deafened",
    "exhaustion",
    "frightened",
    "grappled",
    "incapacitated",
    "invisible",
    "paralyzed",
    "petrified",
    "poisoned",
    "prone",
    "restrained",
    "stunned",
    "unconscious",
];

pub const SKILLS: &[&str] = &[
    "Acrobatics",
    "Animal Handling",
    "Arcana",
    "Athletics",
    "Deception",
    "History",
    "Insight",
    "Intimidation",
    "Investigation",
    "Medicine",
    "Nature",
    "Perception",
    "Performance",
    "Persuasion",
    "Religion",
    "Sleight of Hand",
    "Stealth",
    "Survival",
];

pub const ACTIONS: &[&str] = &[
    "Attack",
    "Dash",
    "Disengage",
    "Dodge",
    "Help",
    "Hide",
    "Ready",
    "Search",
    "Use an Object",
];

pub const SENSES: &[&str] = &["blindsight", "darkvision", "tremorsense", "truesight"];

pub const DAMAGE_TYPES: &[&str] = &[
    "acid",
    "bludgeoning",
    "cold",
    "fire",
    "force",
    "lightning",
    "necrotic",
    "piercing",
    "poison",
    "psychic",
    "radiant",
    "slashing",
    "thunder",
];

pub const CREATURE_TYPES: &[&str] = &[
    "aberration",
    "beast",
    "celestial",
    "construct",
    "dragon",
    "elemental",
    "fey",
    "fiend",
    "giant",
    "humanoid",
    "monstrosity",
    "ooze",
    "plant",
    "undead",
];

/// Standard and exotic languages recognized in "Languages" traits.
pub const LANGUAGES: &[&str] = &[
    "Common",
    "Dwarvish",
    "Elvish",
    "Giant",
    "Gnomish",
    "Goblin",
    "Halfling",
    "Orc",
    "Abyssal",
    "Celestial",
    "Draconic",
    "Deep Speech",
    "Infernal",
    "Primordial",
    "Sylvan",
    "Undercommon",
];

/// Returns the abbreviation (`"wis"`) for a full ability name, ignoring case.
pub fn ability_abbreviation(full_name: &str) -> Option<&'static str> {
    ABILITIES
        .iter()
        .find(|(_, full)| full.eq_ignore_ascii_case(full_name))
        .map(|(abv, _)| *abv)
}

/// Returns `true` for a full ability score name ("Strength", "Wisdom", ...).
pub fn is_ability_name(text: &str) -> bool {
    ABILITIES.iter().any(|(_, full)| *full == text)
}

/// A condition known to the tagger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionEntry {
    pub name: String,
    pub source: String,
}

/// Vocabulary shared by one [`Converter`](crate::statblock::pipeline::Converter).
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Keyed by lower-cased condition name.
    conditions: BTreeMap<String, ConditionEntry>,
}

impl Vocabulary {
    /// The built-in vocabulary with no homebrew additions.
    pub fn builtin() -> Self {
        let conditions = CONDITIONS
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    ConditionEntry {
                        name: name.to_string(),
                        source: DEFAULT_CONDITION_SOURCE.to_string(),
                    },
                )
            })
            .collect();
        Self { conditions }
    }

    /// Add (or override the source of) a homebrew condition.
    pub fn with_condition(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        let name = name.into();
        self.conditions.insert(
            name.to_lowercase(),
            ConditionEntry {
                name,
                source: source.into(),
            },
        );
        self
    }

    /// Look up the source that defines a condition, case-insensitively.
    pub fn condition_source(&self, name: &str) -> Option<&str> {
        self.conditions
            .get(&name.to_lowercase())
            .map(|entry| entry.source.as_str())
    }

    /// All condition names, in a stable order.
    pub fn condition_names(&self) -> impl Iterator<Item = &str> {
        self.conditions.values().map(|entry| entry.name.as_str())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_conditions_resolve_to_default_source() {
        let vocabulary = Vocabulary::builtin();
        assert_eq!(vocabulary.condition_source("Prone"), Some("PHB"));
        assert_eq!(vocabulary.condition_source("dazed"), None);
    }

    #[test]
    fn homebrew_conditions_extend_the_table() {
        let vocabulary = Vocabulary::builtin().with_condition("Dazed", "MyBrew");
        assert_eq!(vocabulary.condition_source("dazed"), Some("MyBrew"));
        assert!(vocabulary.condition_names().any(|name| name == "Dazed"));
    }

    #[test]
    fn ability_lookups() {
        assert_eq!(ability_abbreviation("wisdom"), Some("wis"));
        assert!(is_ability_name("Charisma"));
        assert!(!is_ability_name("Charm"));
    }
}
