//! Dice-roll table lookahead
//!
//! A random table pasted from a PDF comes out as a header line (`d8 Personality Trait`)
//! followed by one row per line, each opening with its roll (`1`, `2-3`, `10+`, `00`):
//!
//! ```text
//! Dwarven Trinkets        <- optional caption (a title line)
//! d6  Trinket             <- header: dice expression, column label
//! 1   A tarnished ring
//! 2-3 A cracked tankard
//! ```
//!
//! Rows are split at the first run of whitespace into the roll and the result.

use crate::statblock::ast::Table;
use crate::statblock::lexing::{is_blank, is_title_line};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d*d\d+)\s+(\S.*)$").unwrap());

static ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\s*-\s*\d+)?\+?|00)\s+(\S.*)$").unwrap());

/// Try to read a dice table starting at `lines[start]`.
///
/// Returns the table and the index of the first line after it.
pub fn read_dice_table(lines: &[&str], start: usize) -> Option<(Table, usize)> {
    let first = lines.get(start)?.trim();
    if let Some(found) = read_from_header(lines, start, None) {
        return Some(found);
    }
    if !is_title_line(first) {
        return None;
    }
    let header = next_non_blank(lines, start + 1)?;
    read_from_header(lines, header, Some(first.to_string()))
}

fn read_from_header(
    lines: &[&str],
    header: usize,
    caption: Option<String>,
) -> Option<(Table, usize)> {
    let caps = HEADER.captures(lines.get(header)?.trim())?;
    let column_labels = vec![caps[1].to_string(), caps[2].trim().to_string()];

    let mut rows = Vec::new();
    let mut end = header + 1;
    while let Some(line) = lines.get(end) {
        let line = line.trim();
        let Some(row) = ROW.captures(line) else {
            break;
        };
        rows.push(vec![compact_roll(&row[1]), row[2].trim().to_string()]);
        end += 1;
    }
    if rows.is_empty() {
        return None;
    }

    log::trace!("dice table with {} rows", rows.len());
    Some((
        Table {
            caption,
            column_labels,
            rows,
        },
        end,
    ))
}

fn next_non_blank(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| !is_blank(lines[i]))
}

/// `"2 - 3"` -> `"2-3"`
fn compact_roll(roll: &str) -> String {
    roll.chars().filter(|ch| !ch.is_whitespace()).collect()
}
