//! Entity records
//!
//! The typed output of a conversion. Fields serialize in declaration order, which is the field
//! order of the output format; unset fields are omitted.

use crate::statblock::ast::DocumentNode;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Ability score increases keyed by abbreviation (`"str"`, `"cha"`, ...).
pub type AbilityIncrease = BTreeMap<String, i32>;

/// Language proficiencies keyed by lower-cased language, plus `anyStandard` for free picks.
pub type LanguageProficiency = BTreeMap<String, serde_json::Value>;

/// A race record.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub name: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lineage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Speed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability: Option<Vec<AbilityIncrease>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creature_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creature_type_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub darkvision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_proficiencies: Option<Vec<LanguageProficiency>>,
    pub entries: Vec<DocumentNode>,
}

impl Race {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ..Default::default()
        }
    }
}

/// Movement speed: a bare walking speed, or walking plus other modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Speed {
    Walk(u32),
    Modes(SpeedModes),
}

impl Speed {
    pub fn walk(&self) -> u32 {
        match self {
            Speed::Walk(walk) => *walk,
            Speed::Modes(modes) => modes.walk,
        }
    }

    /// Add a flying speed unless one is already set, promoting a bare walk speed.
    pub fn with_fly(self, fly: SpeedValue) -> Self {
        match self {
            Speed::Walk(walk) => Speed::Modes(SpeedModes {
                walk,
                fly: Some(fly),
                ..Default::default()
            }),
            Speed::Modes(modes) if modes.fly.is_none() => Speed::Modes(SpeedModes {
                fly: Some(fly),
                ..modes
            }),
            modes => modes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpeedModes {
    pub walk: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fly: Option<SpeedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swim: Option<SpeedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climb: Option<SpeedValue>,
}

impl SpeedModes {
    /// Set a mode by its adjective ("flying", "swimming", "climbing").
    pub fn set_mode(&mut self, adjective: &str, value: SpeedValue) -> bool {
        let slot = match adjective.to_ascii_lowercase().as_str() {
            "flying" | "fly" => &mut self.fly,
            "swimming" | "swim" => &mut self.swim,
            "climbing" | "climb" => &mut self.climb,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// A non-walking speed: a number of feet, or "equal to your walking speed" (`true`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedValue {
    Feet(u32),
    EqualToWalk,
}

impl Serialize for SpeedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SpeedValue::Feet(feet) => serializer.serialize_u32(*feet),
            SpeedValue::EqualToWalk => serializer.serialize_bool(true),
        }
    }
}

/// Size abbreviation for a size word ("Medium" -> "M").
pub fn size_abbreviation(size: &str) -> Option<&'static str> {
    let abbreviation = match size.to_ascii_lowercase().as_str() {
        "tiny" => "T",
        "small" => "S",
        "medium" => "M",
        "large" => "L",
        "huge" => "H",
        "gargantuan" => "G",
        _ => return None,
    };
    Some(abbreviation)
}

/// Sort key of a size abbreviation, smallest first.
pub fn size_rank(abbreviation: &str) -> usize {
    ["T", "S", "M", "L", "H", "G"]
        .iter()
        .position(|size| *size == abbreviation)
        .unwrap_or(usize::MAX)
}
