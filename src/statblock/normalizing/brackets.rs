//! Bracket and quote balancing
//!
//! A line that opens more `(`, `[`, `{` or quotes than it closes was cut by the page margin.
//! It is merged with the next line, repeatedly, until the pair balances or there is no
//! non-empty next line left.

const PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}'), ('\u{201C}', '\u{201D}')];

/// Merge lines until every bracket pair and straight quote balances per line.
pub(super) fn balance_pairs(text: &str) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let mut i = 0;
    while i < lines.len() {
        let has_next = lines.get(i + 1).is_some_and(|next| !next.trim().is_empty());
        if has_next && is_unbalanced(&lines[i]) {
            let next = lines.remove(i + 1);
            let merged = format!("{} {}", lines[i].trim_end(), next.trim_start());
            lines[i] = merged;
            continue;
        }
        i += 1;
    }
    lines.join("\n")
}

/// True when the line opens a pair it does not close.
pub(super) fn is_unbalanced(line: &str) -> bool {
    let open_pair = PAIRS.iter().any(|(open, close)| {
        let opened = line.chars().filter(|ch| ch == open).count();
        let closed = line.chars().filter(|ch| ch == close).count();
        opened > closed
    });
    open_pair || line.chars().filter(|ch| *ch == '"').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_pair_kind() {
        assert!(is_unbalanced("see (page"));
        assert!(is_unbalanced("see [page"));
        assert!(is_unbalanced("{@dice 1d6"));
        assert!(is_unbalanced("says \"hi"));
        assert!(is_unbalanced("says \u{201C}hi"));
        assert!(!is_unbalanced("1) first item"));
        assert!(!is_unbalanced("(balanced) [too]"));
    }

    #[test]
    fn blank_next_line_stops_merging() {
        assert_eq!(balance_pairs("open (\n\nclose)"), "open (\n\nclose)");
    }

    #[test]
    fn merged_line_is_space_joined() {
        assert_eq!(balance_pairs("a [b  \n  c] d"), "a [b c] d");
    }
}
