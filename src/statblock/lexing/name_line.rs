//! Inline headings
//!
//! A stat block trait is usually written as a run-in heading: `Darkvision. You can see in dim
//! light...`. The heading ends at the first run of `.`, `!`, `?` or `:`, except where that run
//! is clearly not the end of a heading:
//!
//! - inside an open parenthesis: `Innate Spellcasting (1/Day. Each). ...`
//! - after an honorific: `Mr. Bones. He rattles.`
//! - a decimal point: `Version 2.5 Rules. ...`
//! - a level prefix followed by a title: `3rd Level: Misty Step. ...`
//! - a call and its answer: `Shield? Shield! You raise ...`
//! - a parenthetical qualifier after the heading: `Bite. (Bear Form Only). ...`
//!
//! What remains in front of the split point, minus parenthetical content and stop words, must be
//! in title case and must not be an ability score name or a dice expression.

use crate::statblock::text::{is_stop_word, is_title_case};
use crate::statblock::vocabulary::is_ability_name;
use once_cell::sync::Lazy;
use regex::{Match, Regex};

static PUNCTUATION_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?:]+").unwrap());

static ORDINAL_LEVEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d+(?:st|nd|rd|th)[- ]level$").unwrap());

static DICE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d*d\d+\b").unwrap());

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").unwrap());

const HONORIFICS: &[&str] = &["Mr", "Mrs", "Ms", "Dr", "St"];

/// Headings that look like a name but never are.
const NAME_EXCEPTIONS: &[&str] = &["Hit"];

/// An inline heading split into its name and the rest of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameLine {
    pub name: String,
    pub entry: String,
}

pub fn is_name_line(line: &str) -> bool {
    split_name_line(line).is_some()
}

/// Split `"Name. Rest of sentence"` into its parts. `None` when the line has no inline heading.
pub fn split_name_line(line: &str) -> Option<NameLine> {
    let line = line.trim();
    let runs: Vec<Match<'_>> = PUNCTUATION_RUN.find_iter(line).collect();

    let mut k = 0;
    let (name, rest) = loop {
        let run = *runs.get(k)?;
        let head = line[..run.start()].trim();
        if head.is_empty() {
            return None;
        }
        let next = runs.get(k + 1).copied();

        if has_open_parenthesis(head)
            || is_decimal_point(line, run)
            || (run.as_str() == "." && ends_with_honorific(head))
        {
            k += 1;
            continue;
        }
        if head.chars().all(|ch| ch.is_ascii_digit()) {
            return None;
        }
        if let Some(next) = next {
            let between = line[run.end()..next.start()].trim();
            if ORDINAL_LEVEL.is_match(head)
                && run.as_str().contains(':')
                && !between.is_empty()
                && is_title_case(between)
            {
                k += 1;
                continue;
            }
            if run.as_str() == "?" && next.as_str() == "!" && between.eq_ignore_ascii_case(head) {
                break (line[..next.end()].to_string(), &line[next.end()..]);
            }
        }

        let rest = &line[run.end()..];
        if let Some((qualifier, after)) = trailing_parenthetical(rest) {
            break (format!("{} {}", head, qualifier), after);
        }
        let keeps_punctuation = run.as_str().contains(['?', '!']);
        let name = if keeps_punctuation {
            line[..run.end()].to_string()
        } else {
            head.to_string()
        };
        break (name, rest);
    };

    let entry = rest.trim();
    if entry.is_empty() || !is_heading_text(&name) {
        return None;
    }
    Some(NameLine {
        name,
        entry: entry.to_string(),
    })
}

fn has_open_parenthesis(text: &str) -> bool {
    text.matches('(').count() > text.matches(')').count()
}

fn is_decimal_point(line: &str, run: Match<'_>) -> bool {
    run.as_str() == "."
        && line[..run.start()].ends_with(|ch: char| ch.is_ascii_digit())
        && line[run.end()..].starts_with(|ch: char| ch.is_ascii_digit())
}

fn ends_with_honorific(head: &str) -> bool {
    head.split_whitespace()
        .last()
        .is_some_and(|word| HONORIFICS.contains(&word))
}

/// `" (Bear Form Only). rest"` -> `("(Bear Form Only)", " rest")`
fn trailing_parenthetical(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.trim_start();
    if !rest.starts_with('(') {
        return None;
    }
    let close = rest.find(')')?;
    let after = rest[close + 1..].trim_start();
    let punctuation = PUNCTUATION_RUN.find(after).filter(|m| m.start() == 0)?;
    Some((&rest[..=close], &after[punctuation.end()..]))
}

fn is_heading_text(name: &str) -> bool {
    let without_parens = PARENTHETICAL.replace_all(name, " ");
    let core = without_parens
        .split_whitespace()
        .filter(|word| !is_stop_word(word))
        .collect::<Vec<_>>()
        .join(" ");
    let core = core.trim_end_matches(['.', '!', '?', ':']);

    !core.is_empty()
        && is_title_case(core)
        && !is_ability_name(core)
        && !DICE.is_match(core)
        && !NAME_EXCEPTIONS.contains(&core)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Option<(String, String)> {
        split_name_line(line).map(|n| (n.name, n.entry))
    }

    fn pair(name: &str, entry: &str) -> Option<(String, String)> {
        Some((name.to_string(), entry.to_string()))
    }

    #[test]
    fn test_simple_heading() {
        assert_eq!(
            split("Darkvision. You can see in dim light."),
            pair("Darkvision", "You can see in dim light.")
        );
        assert_eq!(
            split("Ability Score Increase. Your Wisdom score increases by 1."),
            pair(
                "Ability Score Increase",
                "Your Wisdom score increases by 1."
            )
        );
    }

    #[test]
    fn test_colon_heading() {
        assert_eq!(split("Size: Medium"), pair("Size", "Medium"));
    }

    #[test]
    fn test_sentence_is_not_heading() {
        assert!(!is_name_line("You are Medium. Your speed is 30 feet."));
        assert!(!is_name_line("Darkvision."));
        assert!(!is_name_line("no heading here"));
    }

    #[test]
    fn test_exceptions() {
        assert!(!is_name_line("Hit: 7 (1d8 + 3) piercing damage."));
        assert!(!is_name_line("Strength. Your Strength score increases by 2."));
        assert!(!is_name_line("1d6. Fire damage."));
        assert!(!is_name_line("12. Twelve goblins appear."));
    }

    #[test]
    fn test_stop_words_are_ignored() {
        assert_eq!(
            split("Keen Sense of Smell. The dog has advantage."),
            pair("Keen Sense of Smell", "The dog has advantage.")
        );
    }

    #[test]
    fn test_parenthetical_inside_heading() {
        assert_eq!(
            split("Innate Spellcasting (1/day each). The elf can cast"),
            pair("Innate Spellcasting (1/day each)", "The elf can cast")
        );
        assert_eq!(
            split("Breath (Recharge 5. 6). It exhales."),
            pair("Breath (Recharge 5. 6)", "It exhales.")
        );
    }

    #[test]
    fn test_honorific() {
        assert_eq!(
            split("Mr. Bones. He rattles."),
            pair("Mr. Bones", "He rattles.")
        );
    }

    #[test]
    fn test_decimal_point() {
        assert_eq!(
            split("Version 2.5 Rules. Use these."),
            pair("Version 2.5 Rules", "Use these.")
        );
    }

    #[test]
    fn test_level_prefix() {
        assert_eq!(
            split("3rd Level: Misty Step. You can cast it."),
            pair("3rd Level: Misty Step", "You can cast it.")
        );
        assert_eq!(
            split("3rd Level: you gain a feature."),
            pair("3rd Level", "you gain a feature.")
        );
    }

    #[test]
    fn test_call_and_answer() {
        assert_eq!(
            split("Shield? Shield! You raise your arm."),
            pair("Shield? Shield!", "You raise your arm.")
        );
        assert_eq!(split("Why Not! Do it."), pair("Why Not!", "Do it."));
    }

    #[test]
    fn test_trailing_parenthetical() {
        assert_eq!(
            split("Bite. (Bear Form Only). The bear bites."),
            pair("Bite (Bear Form Only)", "The bear bites.")
        );
    }
}
