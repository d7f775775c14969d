//! Tag rewriting
//!
//!     Prose mentions rules vocabulary by name: dice expressions, conditions, skills, senses,
//!     actions. This stage wraps each mention in a tag, `{@<tag> <text>}`, so the output can link
//!     it. Each category is a [`CategoryTagger`]; the [engine] walks a string around the tags it
//!     already holds and hands each category only the untagged text, which is what makes
//!     tagging idempotent.
//!
//!     Categories run in a fixed order (dice, conditions, skills, senses, actions), each over the
//!     output of the previous one, so a later category never tags inside an earlier one's tags.
//!
//!     Formatting tags (`{@b}`, `{@i}`, `{@code}`) do not block: vocabulary inside bold text is
//!     still tagged. Every reference tag blocks.
//!
//!     The [inflicted] scanner is separate: it reads tagged text to decide which conditions a
//!     creature inflicts on others, and never changes the text.

pub mod conditions;
pub mod dice;
pub mod engine;
pub mod inflicted;
pub mod keywords;

pub use engine::{apply_matches, rewrite, split_by_tags, strip_tags, Segment};

use crate::statblock::vocabulary::Vocabulary;
use std::ops::Range;

/// Tags that stop tagging of the text inside them.
pub const REFERENCE_TAGS: &[&str] = &[
    "dice",
    "damage",
    "d20",
    "scaledice",
    "scaledamage",
    "hit",
    "dc",
    "condition",
    "status",
    "skill",
    "sense",
    "action",
    "spell",
    "item",
    "creature",
    "race",
    "language",
    "filter",
    "note",
];

/// Category of a recognized mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Dice,
    Damage,
    D20,
    ScaleDice,
    ScaleDamage,
    Condition,
    Status,
    Skill,
    Sense,
    Action,
}

impl TagKind {
    /// The tag name written into the marker.
    pub fn tag_name(self) -> &'static str {
        match self {
            TagKind::Dice => "dice",
            TagKind::Damage => "damage",
            TagKind::D20 => "d20",
            TagKind::ScaleDice => "scaledice",
            TagKind::ScaleDamage => "scaledamage",
            TagKind::Condition => "condition",
            TagKind::Status => "status",
            TagKind::Skill => "skill",
            TagKind::Sense => "sense",
            TagKind::Action => "action",
        }
    }

    /// Format a marker of this kind around `body`.
    pub fn marker(self, body: &str) -> String {
        format!("{{@{} {}}}", self.tag_name(), body)
    }
}

/// One recognized mention inside an untagged string. Lives only for one rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Byte range in the string handed to [`CategoryTagger::matches`].
    pub span: Range<usize>,
    pub kind: TagKind,
    pub replacement: String,
}

/// A per-category vocabulary tagger.
pub trait CategoryTagger: Send + Sync {
    /// Short name used in logs ("dice", "conditions", ...).
    fn name(&self) -> &str;

    /// Tags whose contents this tagger never touches.
    fn blocking(&self) -> &[&'static str] {
        REFERENCE_TAGS
    }

    /// Non-overlapping mentions in untagged text, in order.
    fn matches(&self, text: &str) -> Vec<TagMatch>;

    /// Whole-string pass after tagging, for rewrites that need to see the new tags.
    fn post_process(&self, text: String) -> String {
        text
    }
}

/// Which categories run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggingOptions {
    pub dice: bool,
    pub conditions: bool,
    pub skills: bool,
    pub senses: bool,
    pub actions: bool,
}

impl Default for TaggingOptions {
    fn default() -> Self {
        Self {
            dice: true,
            conditions: true,
            skills: true,
            senses: true,
            actions: true,
        }
    }
}

/// The ordered set of category taggers. Compiled once and shared across conversions.
pub struct Tagger {
    categories: Vec<Box<dyn CategoryTagger>>,
}

impl Tagger {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, regex::Error> {
        let categories: Vec<Box<dyn CategoryTagger>> = vec![
            Box::new(dice::DiceTagger::new()),
            Box::new(conditions::ConditionTagger::new(vocabulary)?),
            Box::new(keywords::SkillTagger::new()?),
            Box::new(keywords::SenseTagger::new()?),
            Box::new(keywords::ActionTagger::new()?),
        ];
        Ok(Self { categories })
    }

    /// Tag one string with every enabled category.
    pub fn tag(&self, text: &str, options: &TaggingOptions) -> String {
        let mut out = text.to_string();
        for category in &self.categories {
            if !is_enabled(category.name(), options) {
                continue;
            }
            let blocking = category.blocking();
            let rewritten = rewrite(&out, blocking, &mut |plain: &str| {
                apply_matches(plain, &category.matches(plain))
            });
            out = category.post_process(rewritten);
        }
        if out != text {
            log::trace!("tagged {:?} -> {:?}", text, out);
        }
        out
    }
}

fn is_enabled(name: &str, options: &TaggingOptions) -> bool {
    match name {
        "dice" => options.dice,
        "conditions" => options.conditions,
        "skills" => options.skills,
        "senses" => options.senses,
        "actions" => options.actions,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagger() -> Tagger {
        Tagger::new(&Vocabulary::builtin()).unwrap()
    }

    #[test]
    fn test_all_categories() {
        let text = "Hit: 7 (2d6) fire damage and the target is knocked prone. \
                    Make a Wisdom (Perception) check. You have darkvision. You can take the Dash action.";
        assert_eq!(
            tagger().tag(text, &TaggingOptions::default()),
            "Hit: 7 ({@damage 2d6}) fire damage and the target is knocked {@condition prone}. \
             Make a Wisdom ({@skill Perception}) check. You have {@sense darkvision}. \
             You can take the {@action Dash} action."
        );
    }

    #[test]
    fn test_disabled_category_is_skipped() {
        let options = TaggingOptions {
            conditions: false,
            ..Default::default()
        };
        assert_eq!(tagger().tag("You fall prone.", &options), "You fall prone.");
    }

    #[test]
    fn test_tagging_is_idempotent() {
        let tagger = tagger();
        let options = TaggingOptions::default();
        let once = tagger.tag("Roll 1d20+5 or be frightened while concentrating.", &options);
        assert_eq!(tagger.tag(&once, &options), once);
    }

    #[test]
    fn test_tags_inside_formatting() {
        assert_eq!(
            tagger().tag("{@b You are poisoned.}", &TaggingOptions::default()),
            "{@b You are {@condition poisoned}.}"
        );
    }
}
