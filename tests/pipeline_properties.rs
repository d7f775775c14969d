//! Property-based tests for the conversion pipeline
//!
//! Inputs are assembled from line shapes that occur in real pastes, so the generated documents
//! exercise the builder's rules rather than only its fallbacks.

use proptest::prelude::*;
use statblock_parser::statblock::ast::{for_each_text, Item, ListEntry};
use statblock_parser::statblock::building::convert_hanging_lists;
use statblock_parser::statblock::diagnostics::Diagnostics;
use statblock_parser::statblock::normalizing::normalize;
use statblock_parser::statblock::pipeline::{ConvertOptions, Converter};
use statblock_parser::statblock::tagging::TaggingOptions;
use statblock_parser::statblock::vocabulary::Vocabulary;

fn converter() -> Converter {
    Converter::new(Vocabulary::builtin()).unwrap()
}

/// Prose fragments the taggers recognize, mixed with filler.
fn prose_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "you are",
            "the target is",
            "poisoned",
            "prone",
            "frightened",
            "1d6",
            "2d8 + 3",
            "1d6 fire damage",
            "darkvision",
            "concentration",
            "while concentrating",
            "and",
            "or",
            ".",
        ]),
        1..12,
    )
    .prop_map(|words| words.join(" "))
}

fn line_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Size. Your size is Medium.",
        "Speed. Your walking speed is 30 feet.",
        "Keen Senses. You have proficiency in the Perception skill.",
        "• Bite. Your bite deals 1d6 piercing damage.",
        "• Claws. You can use your claws to make unarmed strikes.",
        "• Darkvision. You can see in dim light within 60 feet of you.",
        "• Prone. You drop to the ground.",
        "• a plain bullet point",
        "Actions",
        "the target is knocked prone and must",
        "succeed on a DC 13 Constitution saving throw or be poisoned.",
        "You can take the Dash action as a bonus action.",
        "",
    ])
    .prop_map(str::to_string)
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(line_strategy(), 0..15)
        .prop_map(|lines| format!("Test Race\n{}", lines.join("\n")))
}

/// Markdown documents whose bullets are unbolded `Name. Entry` items, some named by vocabulary
/// words the tagger would otherwise wrap.
fn markdown_document_strategy() -> impl Strategy<Value = String> {
    let item = prop::sample::select(vec![
        "- Darkvision. You can see in the dark.",
        "- Prone. You drop to the ground.",
        "- Poisoned. You feel sick.",
        "- Trance. You meditate for 4 hours.",
        "- a plain bullet point",
    ]);
    prop::collection::vec(item, 1..8)
        .prop_map(|lines| format!("# Test Race\n## Traits\n{}\n", lines.join("\n")))
}

#[test]
fn test_vocabulary_named_bullets_form_hanging_lists() {
    let text = "Test Race\n• Darkvision. You can see in the dark.\n• Prone. You drop to the ground.\n";
    let markdown = "# Test Race\n- Darkvision. You can see in the dark.\n- Prone. You drop to the ground.\n";
    let converter = converter();
    let from_text = converter
        .parse_text(text, &mut ConvertOptions::default(), &mut Diagnostics::new())
        .unwrap();
    let from_markdown = converter
        .parse_markdown(markdown, &mut ConvertOptions::default(), &mut Diagnostics::new())
        .unwrap();
    for entries in [&from_text.entity.entries, &from_markdown.entity.entries] {
        let list = entries[0].as_list().unwrap();
        assert!(list.is_hanging());
        assert_eq!(
            list.items[1],
            ListEntry::Item(Item {
                name: "Prone".to_string(),
                entry: "You drop to the ground.".to_string(),
            })
        );
    }
}

fn raw_text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,.()\"\\-\n]{0,200}"
}

proptest! {
    #[test]
    fn test_tagging_is_idempotent(text in prose_strategy()) {
        let converter = converter();
        let options = TaggingOptions::default();
        let once = converter.tag(&text, &options);
        prop_assert_eq!(converter.tag(&once, &options), once);
    }

    #[test]
    fn test_normalizing_is_idempotent(text in raw_text_strategy()) {
        let once = normalize(&text, None);
        prop_assert_eq!(normalize(&once, None), once);
    }

    #[test]
    fn test_conversion_never_fails_with_a_name(input in document_strategy()) {
        let mut diagnostics = Diagnostics::new();
        let conversion = converter()
            .parse_text(&input, &mut ConvertOptions::default(), &mut diagnostics);
        prop_assert!(conversion.is_ok());
        if let Ok(conversion) = conversion {
            prop_assert_eq!(conversion.entity.name, "Test Race");
        }
    }

    #[test]
    fn test_tag_braces_stay_balanced(input in document_strategy()) {
        let mut diagnostics = Diagnostics::new();
        let conversion = converter()
            .parse_text(&input, &mut ConvertOptions::default(), &mut diagnostics)
            .unwrap();
        let mut unbalanced = Vec::new();
        for_each_text(&conversion.entity.entries, |text| {
            if text.matches('{').count() != text.matches('}').count() {
                unbalanced.push(text.to_string());
            }
        });
        prop_assert!(unbalanced.is_empty(), "unbalanced: {:?}", unbalanced);
    }

    #[test]
    fn test_hanging_list_cleanup_is_settled(input in document_strategy()) {
        let mut diagnostics = Diagnostics::new();
        let mut conversion = converter()
            .parse_text(&input, &mut ConvertOptions::default(), &mut diagnostics)
            .unwrap();
        prop_assert_eq!(convert_hanging_lists(&mut conversion.entity.entries), 0);
    }

    #[test]
    fn test_markdown_named_bullets_are_hanging(input in markdown_document_strategy()) {
        let mut diagnostics = Diagnostics::new();
        let mut conversion = converter()
            .parse_markdown(&input, &mut ConvertOptions::default(), &mut diagnostics)
            .unwrap();
        let section = conversion.entity.entries[0].as_section().unwrap();
        let list = section.children[0].as_list().unwrap();
        prop_assert_eq!(list.is_hanging(), !input.contains("plain bullet"));
        prop_assert_eq!(convert_hanging_lists(&mut conversion.entity.entries), 0);
    }
}
