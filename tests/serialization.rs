//! Snapshot tests for the serialized entity record

use insta::assert_json_snapshot;
use statblock_parser::statblock::ast::{from_json, DocumentNode, Item, List, ListEntry, Table};
use statblock_parser::statblock::testing::Samples;

#[test]
fn test_hill_dwarf_record() {
    let (conversion, _) = Samples::convert("races/hill-dwarf.txt");
    assert_json_snapshot!(conversion.entity, @r###"
    {
      "name": "Hill Dwarf",
      "source": "Homebrew",
      "page": 20,
      "size": [
        "M"
      ],
      "speed": 25,
      "ability": [
        {
          "con": 2,
          "wis": 1
        }
      ],
      "darkvision": 60,
      "languageProficiencies": [
        {
          "common": true,
          "dwarvish": true
        }
      ],
      "entries": [
        {
          "type": "entries",
          "name": "Darkvision",
          "entries": [
            "You can see in dim light within 60 feet of you as if it were bright light, and in darkness as if it were dim light."
          ]
        },
        {
          "type": "entries",
          "name": "Dwarven Resilience",
          "entries": [
            "You have advantage on saving throws against being {@condition poisoned}, and you have resistance against poison damage."
          ]
        },
        {
          "type": "entries",
          "name": "Languages",
          "entries": [
            "You can speak, read, and write Common and Dwarvish."
          ]
        }
      ]
    }
    "###);
}

#[test]
fn test_aarakocra_speed_shape() {
    let (conversion, _) = Samples::convert("races/aarakocra.txt");
    assert_json_snapshot!(conversion.entity.speed, @r###"
    {
      "walk": 30,
      "fly": true
    }
    "###);
}

#[test]
fn test_node_shapes() {
    let nodes = vec![
        DocumentNode::List(List {
            style: Some("list-hang-notitle".to_string()),
            items: vec![ListEntry::Item(Item {
                name: "Bite".to_string(),
                entry: "Melee Weapon Attack.".to_string(),
            })],
        }),
        DocumentNode::Table(Table {
            caption: Some("Trinkets".to_string()),
            column_labels: vec!["d4".to_string(), "Trinket".to_string()],
            rows: vec![vec!["1".to_string(), "A tooth".to_string()]],
        }),
    ];
    assert_json_snapshot!(nodes, @r###"
    [
      {
        "type": "list",
        "style": "list-hang-notitle",
        "items": [
          {
            "type": "item",
            "name": "Bite",
            "entry": "Melee Weapon Attack."
          }
        ]
      },
      {
        "type": "table",
        "caption": "Trinkets",
        "colLabels": [
          "d4",
          "Trinket"
        ],
        "rows": [
          [
            "1",
            "A tooth"
          ]
        ]
      }
    ]
    "###);
}

#[test]
fn test_serialized_tree_reads_back() {
    let (conversion, _) = Samples::convert("races/custom-lineage.txt");
    let value = serde_json::to_value(&conversion.entity.entries).unwrap();
    let read_back: Vec<DocumentNode> = match value {
        serde_json::Value::Array(items) => items.into_iter().map(from_json).collect(),
        other => panic!("expected an array, got {}", other),
    };
    assert_eq!(read_back, conversion.entity.entries);
}
