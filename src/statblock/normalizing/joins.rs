//! Line-join rules
//!
//! Fixed "this break is not real" patterns. Each one is anchored on a token that strongly
//! implies the sentence continues on the next line. The next line must not start with a list
//! marker; a break before a bullet is always kept.

use once_cell::sync::Lazy;
use regex::Regex;

static HYPHENATED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)(^|[ "(])([A-Za-z][a-z]+)- *\n([a-z])"#).unwrap());

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*,[ \t]*\n[ \t]*([^-*+•●\s])").unwrap());

static LEADING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*\n[ \t]*,[ \t]*").unwrap());

/// `(pattern, replacement)` pairs applied in order.
static CONTINUATIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    let damage_types = crate::statblock::vocabulary::DAMAGE_TYPES.join("|");
    vec![
        // `2d6)` / `7` at the end of a line, damage type on the next
        (
            Regex::new(&format!(
                r"(?i)(\d\)?)[ \t]*\n[ \t]*((?:{})[ \t]+damage)\b",
                damage_types
            ))
            .unwrap(),
            "${1} ${2}",
        ),
        // Ability name at the end of a line, parenthesized skill on the next
        (
            Regex::new(
                r"\b(Strength|Dexterity|Constitution|Intelligence|Wisdom|Charisma)[ \t]*\n[ \t]*\(",
            )
            .unwrap(),
            "${1} (",
        ),
        (
            Regex::new(r"(?i)\b(hit)[ \t]*\n[ \t]*(points?)\b").unwrap(),
            "${1} ${2}",
        ),
        (
            Regex::new(r"(?i)\b(saving)[ \t]*\n[ \t]*(throws?)\b").unwrap(),
            "${1} ${2}",
        ),
        (
            Regex::new(r"\b([Ss]ave)[ \t]*\n[ \t]*(DC)\b").unwrap(),
            "${1} ${2}",
        ),
        (
            Regex::new(r"(\+\d+ to)[ \t]*\n[ \t]*(hit)\b").unwrap(),
            "${1} ${2}",
        ),
        // Trailing determiner or preposition
        (
            Regex::new(
                r"(?i)\b(the|a|an|of|to|with|by|your|its|their|for|from|into|within)[ \t]*\n[ \t]*([A-Za-z0-9(])",
            )
            .unwrap(),
            "${1} ${2}",
        ),
    ]
});

/// `"word-\nbreak"` becomes `"wordbreak"` when the tail starts lower case.
pub(super) fn rejoin_hyphenated_words(text: &str) -> String {
    HYPHENATED_WORD
        .replace_all(text, "${1}${2}${3}")
        .into_owned()
}

/// Lines ending or beginning with a comma join their neighbor.
pub(super) fn join_commas(text: &str) -> String {
    let text = TRAILING_COMMA.replace_all(text, ", ${1}");
    LEADING_COMMA.replace_all(&text, ", ").into_owned()
}

pub(super) fn join_continuations(text: &str) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in CONTINUATIONS.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphen_join_requires_lowercase_tail() {
        assert_eq!(rejoin_hyphenated_words("half-\nling"), "halfling");
        assert_eq!(rejoin_hyphenated_words("Half-\nElf"), "Half-\nElf");
    }

    #[test]
    fn trailing_comma_joins_next_line() {
        assert_eq!(join_commas("Common,\nElvish"), "Common, Elvish");
    }

    #[test]
    fn trailing_comma_keeps_list_items_apart() {
        assert_eq!(join_commas("Common,\n- Elvish"), "Common,\n- Elvish");
    }

    #[test]
    fn blank_line_blocks_comma_joins() {
        assert_eq!(join_commas("Common,\n\nSpeed."), "Common,\n\nSpeed.");
        assert_eq!(join_commas("Common\n\n, Elvish"), "Common\n\n, Elvish");
    }

    #[test]
    fn leading_comma_joins_previous_line() {
        assert_eq!(join_commas("Common\n, Elvish"), "Common, Elvish");
    }

    #[test]
    fn dice_followed_by_damage_type() {
        assert_eq!(
            join_continuations("takes 7 (2d6)\nfire damage"),
            "takes 7 (2d6) fire damage"
        );
        assert_eq!(
            join_continuations("takes 7 (2d6)\n\nFire damage spreads."),
            "takes 7 (2d6)\n\nFire damage spreads."
        );
    }

    #[test]
    fn ability_name_followed_by_skill() {
        assert_eq!(
            join_continuations("a Wisdom\n(Perception) check"),
            "a Wisdom (Perception) check"
        );
    }

    #[test]
    fn trailing_determiner() {
        assert_eq!(
            join_continuations("You can see in dim light within 60 feet of\nyou."),
            "You can see in dim light within 60 feet of you."
        );
    }

    #[test]
    fn determiner_before_bullet_is_kept() {
        assert_eq!(join_continuations("one of the\n• items"), "one of the\n• items");
    }

    #[test]
    fn ordinary_break_is_kept() {
        assert_eq!(join_continuations("Size\nSpeed"), "Size\nSpeed");
    }
}
