//! Race field extraction
//!
//! Field order matters only for the order of warnings: size, ability scores, speed, flight,
//! creature type, darkvision, languages.

use super::{field_line, remove_at, Presence, SectionPath};
use crate::statblock::ast::for_each_text;
use crate::statblock::diagnostics::DiagnosticSink;
use crate::statblock::entity::{
    size_abbreviation, size_rank, AbilityIncrease, LanguageProficiency, Race, Speed, SpeedModes,
    SpeedValue,
};
use crate::statblock::vocabulary::{ability_abbreviation, ABILITIES, CREATURE_TYPES, LANGUAGES};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Ability-score lineage marker for the "+2/+1 or +1/+1/+1" phrasing.
pub const FLEXIBLE_LINEAGE: &str = "VRGR";

/// Run every race extractor over `race.entries`, filling typed fields in place.
pub fn extract_race(race: &mut Race, sink: &mut dyn DiagnosticSink) {
    extract_size(race, sink);
    extract_ability(race, sink);
    extract_speed(race, sink);
    extract_flight(race);
    extract_creature_type(race, sink);
    extract_darkvision(race, sink);
    extract_languages(race, sink);
}

/// Outcome of matching one field's prose.
enum Extracted {
    /// The field now says everything; drop the section.
    Redundant,
    /// The field is set but the prose adds detail; keep the section.
    Kept,
    Unmatched,
}

fn finish(
    race: &mut Race,
    path: SectionPath,
    text: &str,
    outcome: Extracted,
    code: &'static str,
    label: &str,
    sink: &mut dyn DiagnosticSink,
) {
    match outcome {
        Extracted::Redundant => {
            remove_at(&mut race.entries, &path);
        }
        Extracted::Kept => {}
        Extracted::Unmatched => sink.warn(
            code,
            format!("{} requires manual conversion: \"{}\"", label, text),
        ),
    }
}

// ============================================================================
// SIZE
// ============================================================================

static SIZE_SINGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:You are|Your size is) (Tiny|Small|Medium|Large|Huge|Gargantuan)\.$")
        .unwrap()
});

static SIZE_CHOICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^You are (Tiny|Small|Medium|Large) or (Tiny|Small|Medium|Large)\. You choose the size when you select this race\.$",
    )
    .unwrap()
});

fn extract_size(race: &mut Race, sink: &mut dyn DiagnosticSink) {
    let Some((path, text)) = field_line(&race.entries, &["Size"], Presence::Required, "size", sink)
    else {
        return;
    };

    let outcome = if let Some(caps) = SIZE_SINGLE.captures(&text) {
        race.size = size_abbreviation(&caps[1]).map(|size| vec![size.to_string()]);
        Extracted::Redundant
    } else if let Some(caps) = SIZE_CHOICE.captures(&text) {
        let mut sizes: Vec<String> = [&caps[1], &caps[2]]
            .iter()
            .filter_map(|size| size_abbreviation(size))
            .map(str::to_string)
            .collect();
        sizes.sort_by_key(|size| size_rank(size));
        sizes.dedup();
        race.size = Some(sizes);
        Extracted::Kept
    } else {
        Extracted::Unmatched
    };
    finish(race, path, &text, outcome, "size", "Size", sink);
}

// ============================================================================
// ABILITY SCORES
// ============================================================================

static ABILITY_LINEAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)increase one (?:ability )?score by 2 and increase a different (?:one|score) by 1, or increase three different (?:ability )?scores by 1",
    )
    .unwrap()
});

static ABILITY_NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^Your (\w+) score increases by (\d+)(?:,? and your (\w+) score increases by (\d+))?\.$",
    )
    .unwrap()
});

static ABILITY_ALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Your ability scores each increase by (\d+)\.$").unwrap());

fn named_increase(caps: &Captures) -> Option<AbilityIncrease> {
    let mut increase = AbilityIncrease::new();
    for (name_group, amount_group) in [(1, 2), (3, 4)] {
        let Some(name) = caps.get(name_group) else {
            continue;
        };
        let abbreviation = ability_abbreviation(name.as_str())?;
        let amount = caps.get(amount_group)?.as_str().parse().ok()?;
        increase.insert(abbreviation.to_string(), amount);
    }
    Some(increase)
}

fn extract_ability(race: &mut Race, sink: &mut dyn DiagnosticSink) {
    let labels = ["Ability Score Increase", "Ability Score Increases"];
    let Some((path, text)) = field_line(&race.entries, &labels, Presence::Optional, "ability", sink)
    else {
        return;
    };

    let outcome = if ABILITY_LINEAGE.is_match(&text) {
        race.lineage = Some(FLEXIBLE_LINEAGE.to_string());
        Extracted::Redundant
    } else if let Some(increase) = ABILITY_NAMED.captures(&text).and_then(|c| named_increase(&c)) {
        race.ability = Some(vec![increase]);
        Extracted::Redundant
    } else if let Some(amount) = ABILITY_ALL
        .captures(&text)
        .and_then(|caps| caps[1].parse::<i32>().ok())
    {
        let increase = ABILITIES
            .iter()
            .map(|(abbreviation, _)| (abbreviation.to_string(), amount))
            .collect();
        race.ability = Some(vec![increase]);
        Extracted::Redundant
    } else {
        Extracted::Unmatched
    };
    finish(race, path, &text, outcome, "ability", "Ability Score Increase", sink);
}

// ============================================================================
// SPEED
// ============================================================================

static SPEED_WALK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Your (?:walking )?speed is (\d+) feet\.$").unwrap());

static SPEED_BASE_WALK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Your base walking speed is (\d+) feet\.$").unwrap());

static SPEED_MODE_EQUAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^Your walking speed is (\d+) feet, and you have an? (swimming|climbing|flying) speed equal to your walking speed\.$",
    )
    .unwrap()
});

static SPEED_MODE_FEET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^Your walking speed is (\d+) feet, and you have an? (swimming|climbing|flying) speed of (\d+) feet\.$",
    )
    .unwrap()
});

fn walk_with_mode(walk: &str, mode: &str, value: SpeedValue) -> Option<Speed> {
    let mut modes = SpeedModes {
        walk: walk.parse().ok()?,
        ..Default::default()
    };
    modes.set_mode(mode, value).then_some(Speed::Modes(modes))
}

fn match_speed(text: &str) -> Option<(Speed, Extracted)> {
    if let Some(caps) = SPEED_WALK
        .captures(text)
        .or_else(|| SPEED_BASE_WALK.captures(text))
    {
        return Some((Speed::Walk(caps[1].parse().ok()?), Extracted::Redundant));
    }
    if let Some(caps) = SPEED_MODE_EQUAL.captures(text) {
        let speed = walk_with_mode(&caps[1], &caps[2], SpeedValue::EqualToWalk)?;
        return Some((speed, Extracted::Kept));
    }
    if let Some(caps) = SPEED_MODE_FEET.captures(text) {
        let feet = SpeedValue::Feet(caps[3].parse().ok()?);
        let speed = walk_with_mode(&caps[1], &caps[2], feet)?;
        return Some((speed, Extracted::Kept));
    }
    None
}

fn extract_speed(race: &mut Race, sink: &mut dyn DiagnosticSink) {
    let Some((path, text)) =
        field_line(&race.entries, &["Speed"], Presence::Required, "speed", sink)
    else {
        return;
    };

    let outcome = match match_speed(&text) {
        Some((speed, outcome)) => {
            race.speed = Some(speed);
            outcome
        }
        None => Extracted::Unmatched,
    };
    finish(race, path, &text, outcome, "speed", "Speed", sink);
}

// ============================================================================
// FLIGHT
// ============================================================================

static FLIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\byou have a flying speed (?:equal to your walking speed|of (\d+) feet)",
    )
    .unwrap()
});

static TEMPORARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btemporarily\b|\buntil\b.*\bends\b").unwrap());

fn is_sentence_end(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// The flying speed a string grants permanently, if any.
fn permanent_flight(text: &str) -> Option<SpeedValue> {
    FLIGHT.captures_iter(text).find_map(|caps| {
        let found = caps.get(0)?;
        let start = text[..found.start()]
            .rfind(is_sentence_end)
            .map_or(0, |index| index + 1);
        let end = text[found.end()..]
            .find(is_sentence_end)
            .map_or(text.len(), |index| found.end() + index);
        if TEMPORARY.is_match(&text[start..end]) {
            log::trace!("skipping temporary flight: {:?}", &text[start..end]);
            return None;
        }
        match caps.get(1) {
            Some(feet) => feet.as_str().parse().ok().map(SpeedValue::Feet),
            None => Some(SpeedValue::EqualToWalk),
        }
    })
}

/// Scan all prose for a permanent flying speed and merge it into an extracted speed.
fn extract_flight(race: &mut Race) {
    let Some(speed) = race.speed else {
        return;
    };
    let mut flight = None;
    for_each_text(&race.entries, |text| {
        if flight.is_none() {
            flight = permanent_flight(text);
        }
    });
    if let Some(fly) = flight {
        race.speed = Some(speed.with_fly(fly));
    }
}

// ============================================================================
// CREATURE TYPE
// ============================================================================

static HUMANOID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bYou are an? (Humanoid)\.\s*").unwrap());

static NAMED_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:You are an?|Your creature type is) ({})\.\s*",
        CREATURE_TYPES.join("|")
    ))
    .unwrap()
});

static ALSO_CONSIDERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s*You are also considered an? ([A-Za-z-]+(?: [A-Za-z-]+)?) for any prerequisite or effect that requires you to be an? [A-Za-z -]+?\.\s*",
    )
    .unwrap()
});

fn consume(pattern: &Regex, text: &str, found: &mut Vec<String>) -> String {
    pattern
        .replace_all(text, |caps: &Captures| {
            found.push(caps[1].to_lowercase());
            ""
        })
        .into_owned()
}

fn extract_creature_type(race: &mut Race, sink: &mut dyn DiagnosticSink) {
    let labels = ["Creature Type", "Type"];
    let Some((path, text)) =
        field_line(&race.entries, &labels, Presence::Optional, "creature-type", sink)
    else {
        return;
    };

    let mut types = Vec::new();
    let mut tags = Vec::new();
    let rest = consume(&HUMANOID, &text, &mut types);
    let rest = consume(&NAMED_TYPE, &rest, &mut types);
    let rest = consume(&ALSO_CONSIDERED, &rest, &mut tags);

    if !types.is_empty() {
        race.creature_types = Some(types);
    }
    if !tags.is_empty() {
        race.creature_type_tags = Some(tags);
    }

    let rest = rest.trim();
    if rest.is_empty() {
        remove_at(&mut race.entries, &path);
    } else {
        sink.warn(
            "creature-type",
            format!("Creature Type requires manual conversion: \"{}\"", rest),
        );
    }
}

// ============================================================================
// DARKVISION
// ============================================================================

static DARKVISION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)see in dim light within (\d+) feet of you as if it were bright light")
        .unwrap()
});

fn extract_darkvision(race: &mut Race, sink: &mut dyn DiagnosticSink) {
    let labels = ["Darkvision", "Superior Darkvision"];
    let Some((path, text)) =
        field_line(&race.entries, &labels, Presence::Optional, "darkvision", sink)
    else {
        return;
    };

    let radius = DARKVISION
        .captures(&text)
        .and_then(|caps| caps[1].parse::<u32>().ok());
    let outcome = match radius {
        Some(radius) => {
            race.darkvision = Some(radius);
            Extracted::Kept
        }
        None => Extracted::Unmatched,
    };
    finish(race, path, &text, outcome, "darkvision", "Darkvision", sink);
}

// ============================================================================
// LANGUAGES
// ============================================================================

static LANGUAGE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^You can speak, read, and write Common and (.+?)\.(?:\s.*)?$").unwrap()
});

fn language_proficiency(other: &str) -> Option<LanguageProficiency> {
    let mut proficiency = LanguageProficiency::new();
    proficiency.insert("common".to_string(), serde_json::Value::Bool(true));

    if other.to_lowercase().starts_with("one other language") {
        proficiency.insert("anyStandard".to_string(), serde_json::Value::from(1));
        return Some(proficiency);
    }
    let language = LANGUAGES
        .iter()
        .find(|language| language.eq_ignore_ascii_case(other))?;
    proficiency.insert(language.to_lowercase(), serde_json::Value::Bool(true));
    Some(proficiency)
}

fn extract_languages(race: &mut Race, sink: &mut dyn DiagnosticSink) {
    let Some((path, text)) =
        field_line(&race.entries, &["Languages"], Presence::Optional, "languages", sink)
    else {
        return;
    };

    let proficiency = LANGUAGE_PAIR
        .captures(&text)
        .and_then(|caps| language_proficiency(&caps[1]));
    let outcome = match proficiency {
        Some(proficiency) => {
            race.language_proficiencies = Some(vec![proficiency]);
            Extracted::Kept
        }
        None => Extracted::Unmatched,
    };
    finish(race, path, &text, outcome, "languages", "Languages", sink);
}
