//! Dice and damage tagging
//!
//!     Dice tokens (`NdM` with an optional arithmetic tail) are found with a regex, then parsed
//!     with a small chumsky grammar:
//!
//!         dice     = count? "d" faces (op modifier)*
//!         op       = "+" | "-" | "×" | "x" | "*" | "÷" | "/"
//!
//!     A parsed expression is re-rendered with normalized spacing (`1d8+2` -> `1d8 + 2`) and
//!     wrapped as `{@dice ...}`. Tokens the grammar rejects (`05d6`) are left alone.
//!
//!     After the pass, a dice marker followed by a damage type and the word "damage" is
//!     upgraded to `{@damage ...}`. Markers of the dice family nested inside each other are then
//!     collapsed into one, keeping the most specific kind, until nothing changes.

use super::{CategoryTagger, TagKind, TagMatch};
use crate::statblock::vocabulary::DAMAGE_TYPES;
use chumsky::prelude::*;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

static DICE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d*d\d+(?:\s*[-+×x*÷/]\s*\d+)*\b").unwrap());

static DAMAGE_UPGRADE: Lazy<Regex> = Lazy::new(|| {
    let types = DAMAGE_TYPES.join("|");
    Regex::new(&format!(
        r"\{{@dice ([^{{}}]+)\}}(\)?(?:\s*(?:plus|minus|\+|-)\s*\d+)?\s+(?:(?:{types})(?:,\s*|,?\s+or\s+|\s+and\s+))*(?:{types})\s+damage)"
    ))
    .unwrap()
});

static NESTED_DICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\{@(dice|damage|d20|scaledice|scaledamage) ([^{}]*)\{@(dice|damage|d20|scaledice|scaledamage) ([^{}]*)\}([^{}]*)\}",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl DiceOp {
    fn symbol(self) -> char {
        match self {
            DiceOp::Add => '+',
            DiceOp::Sub => '-',
            DiceOp::Mul => '×',
            DiceOp::Div => '÷',
        }
    }
}

/// A parsed dice expression such as `2d6 + 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceExpr {
    /// Number of dice; `d20` has none.
    pub count: Option<u32>,
    pub faces: u32,
    pub modifiers: Vec<(DiceOp, u32)>,
}

impl DiceExpr {
    /// Parse a whole string as a dice expression.
    pub fn parse(text: &str) -> Option<Self> {
        dice_parser().parse(text).ok()
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(count) = self.count {
            write!(f, "{}", count)?;
        }
        write!(f, "d{}", self.faces)?;
        for (op, value) in &self.modifiers {
            write!(f, " {} {}", op.symbol(), value)?;
        }
        Ok(())
    }
}

fn dice_parser() -> impl Parser<char, DiceExpr, Error = Simple<char>> {
    let number = text::int::<char, Simple<char>>(10).try_map(|digits: String, span| {
        digits
            .parse::<u32>()
            .map_err(|err| Simple::custom(span, err.to_string()))
    });

    let op = choice((
        just('+').to(DiceOp::Add),
        just('-').to(DiceOp::Sub),
        one_of("×x*").to(DiceOp::Mul),
        one_of("÷/").to(DiceOp::Div),
    ))
    .padded();

    number
        .clone()
        .or_not()
        .then_ignore(just('d'))
        .then(number.clone())
        .then(op.then(number).repeated())
        .then_ignore(end())
        .map(|((count, faces), modifiers)| DiceExpr {
            count,
            faces,
            modifiers,
        })
}

/// Rank within the dice family; higher is more specific.
fn specificity(tag: &str) -> u8 {
    match tag {
        "scaledamage" => 4,
        "damage" => 3,
        "d20" => 2,
        "scaledice" => 1,
        _ => 0,
    }
}

/// Collapse `{@a x {@b y} z}` (both dice-family tags) into one marker of the more specific kind.
pub fn collapse_nested(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = NESTED_DICE
            .replace_all(&current, |caps: &Captures| {
                let outer = &caps[1];
                let inner = &caps[3];
                let tag = if specificity(inner) > specificity(outer) {
                    inner
                } else {
                    outer
                };
                format!("{{@{} {}{}{}}}", tag, &caps[2], &caps[4], &caps[5])
            })
            .into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

pub struct DiceTagger;

impl DiceTagger {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiceTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTagger for DiceTagger {
    fn name(&self) -> &str {
        "dice"
    }

    fn matches(&self, text: &str) -> Vec<TagMatch> {
        DICE_TOKEN
            .find_iter(text)
            .filter_map(|found| {
                let expr = DiceExpr::parse(found.as_str())?;
                Some(TagMatch {
                    span: found.range(),
                    kind: TagKind::Dice,
                    replacement: TagKind::Dice.marker(&expr.to_string()),
                })
            })
            .collect()
    }

    fn post_process(&self, text: String) -> String {
        let upgraded = DAMAGE_UPGRADE.replace_all(&text, "{@damage $1}$2");
        collapse_nested(&upgraded)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{apply_matches, rewrite, REFERENCE_TAGS};
    use super::*;

    fn tag(text: &str) -> String {
        let tagger = DiceTagger::new();
        let out = rewrite(text, REFERENCE_TAGS, &mut |plain: &str| {
            apply_matches(plain, &tagger.matches(plain))
        });
        tagger.post_process(out)
    }

    #[test]
    fn test_parse_dice() {
        assert_eq!(
            DiceExpr::parse("2d6+3"),
            Some(DiceExpr {
                count: Some(2),
                faces: 6,
                modifiers: vec![(DiceOp::Add, 3)],
            })
        );
        assert_eq!(DiceExpr::parse("d20").map(|e| e.count), Some(None));
        assert_eq!(DiceExpr::parse("1d6 x 10").map(|e| e.to_string()), Some("1d6 × 10".into()));
        assert_eq!(DiceExpr::parse("05d6"), None);
        assert_eq!(DiceExpr::parse("2d"), None);
    }

    #[test]
    fn test_dice_spacing_is_normalized() {
        assert_eq!(tag("Roll 1d8+2 now."), "Roll {@dice 1d8 + 2} now.");
        assert_eq!(tag("a d20 roll"), "a {@dice d20} roll");
    }

    #[test]
    fn test_words_are_not_dice() {
        assert_eq!(tag("Add 20 gold to the hoard."), "Add 20 gold to the hoard.");
    }

    #[test]
    fn test_damage_upgrade() {
        assert_eq!(
            tag("7 (2d6) fire damage"),
            "7 ({@damage 2d6}) fire damage"
        );
        assert_eq!(
            tag("takes 1d6 piercing damage"),
            "takes {@damage 1d6} piercing damage"
        );
        assert_eq!(
            tag("(1d6) bludgeoning, piercing, or slashing damage"),
            "({@damage 1d6}) bludgeoning, piercing, or slashing damage"
        );
        assert_eq!(tag("roll 1d6 fire dice"), "roll {@dice 1d6} fire dice");
    }

    #[test]
    fn test_existing_markers_are_not_retagged() {
        assert_eq!(tag("{@damage 2d6} and {@hit 5}"), "{@damage 2d6} and {@hit 5}");
    }

    #[test]
    fn test_collapse_prefers_specific_kind() {
        assert_eq!(collapse_nested("{@dice {@damage 2d6}}"), "{@damage 2d6}");
        assert_eq!(collapse_nested("{@damage {@dice 2d6} + 1}"), "{@damage 2d6 + 1}");
        assert_eq!(
            collapse_nested("{@dice {@dice {@scaledamage 1d6}}}"),
            "{@scaledamage 1d6}"
        );
    }
}
