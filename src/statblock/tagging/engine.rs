//! Tag-aware string rewriting
//!
//! A string is split into plain runs and `{@name body}` tags, matching braces so a tag may hold
//! other tags. [`rewrite`] descends into tag bodies, counting how many blocking tags enclose the
//! current run, and only hands runs with no blocking ancestor to the tagger.

use super::TagMatch;

/// Deepest tag nesting the rewriter descends into. Bodies below this are copied verbatim.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Tag {
        /// `{@name` plus the separating space, if any.
        head: &'a str,
        name: &'a str,
        body: &'a str,
    },
}

/// Split `text` into plain runs and top-level tags.
///
/// An opening `{@` with no matching close brace is ordinary text.
pub fn split_by_tags(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find("{@") {
        let start = cursor + offset;
        match tag_end(text, start) {
            Some(end) => {
                if plain_start < start {
                    segments.push(Segment::Plain(&text[plain_start..start]));
                }
                segments.push(parse_tag(&text[start..end]));
                plain_start = end;
                cursor = end;
            }
            None => cursor = start + 2,
        }
    }

    if plain_start < text.len() {
        segments.push(Segment::Plain(&text[plain_start..]));
    }
    segments
}

fn tag_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + index + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// `raw` spans a whole tag, braces included.
fn parse_tag(raw: &str) -> Segment<'_> {
    let inner = &raw[2..raw.len() - 1];
    let name_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
    let separator = inner[name_end..]
        .chars()
        .next()
        .map(char::len_utf8)
        .unwrap_or(0);
    let head_end = 2 + name_end + separator;
    Segment::Tag {
        head: &raw[..head_end],
        name: &inner[..name_end],
        body: &raw[head_end..raw.len() - 1],
    }
}

/// Rewrite every run of `text` that no `blocking` tag encloses.
///
/// Runs inside other tags (formatting such as `{@b ...}`) are still rewritten. Tags themselves
/// are copied through unchanged.
pub fn rewrite(text: &str, blocking: &[&str], tagger: &mut dyn FnMut(&str) -> String) -> String {
    rewrite_at(text, blocking, tagger, 0, 0)
}

fn rewrite_at(
    text: &str,
    blocking: &[&str],
    tagger: &mut dyn FnMut(&str) -> String,
    depth: usize,
    enclosing: usize,
) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in split_by_tags(text) {
        match segment {
            Segment::Plain(plain) if enclosing == 0 => out.push_str(&tagger(plain)),
            Segment::Plain(plain) => out.push_str(plain),
            Segment::Tag { head, name, body } => {
                out.push_str(head);
                if depth >= MAX_DEPTH {
                    out.push_str(body);
                } else {
                    let enclosing = enclosing + usize::from(blocking.contains(&name));
                    out.push_str(&rewrite_at(body, blocking, tagger, depth + 1, enclosing));
                }
                out.push('}');
            }
        }
    }
    out
}

/// Splice the replacements of `matches` into `plain`. Matches must be in order; a match that
/// overlaps an earlier one is dropped.
pub fn apply_matches(plain: &str, matches: &[TagMatch]) -> String {
    if matches.is_empty() {
        return plain.to_string();
    }
    let mut out = String::with_capacity(plain.len() + matches.len() * 16);
    let mut last = 0;
    for found in matches {
        if found.span.start < last || found.span.end > plain.len() {
            continue;
        }
        out.push_str(&plain[last..found.span.start]);
        out.push_str(&found.replacement);
        last = found.span.end;
    }
    out.push_str(&plain[last..]);
    out
}

/// Replace every tag with its display text: the third `|` field when present, else the first.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in split_by_tags(text) {
        match segment {
            Segment::Plain(plain) => out.push_str(plain),
            Segment::Tag { body, .. } => {
                let stripped = strip_tags(body);
                let mut fields = stripped.split('|');
                let name = fields.next().unwrap_or_default();
                let display = fields.nth(1).filter(|text| !text.is_empty());
                out.push_str(display.unwrap_or(name));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::super::TagKind;
    use super::*;

    fn upper(text: &str) -> String {
        text.to_uppercase()
    }

    #[test]
    fn test_split_plain_and_tags() {
        let segments = split_by_tags("a {@b bold {@i x}} c");
        assert_eq!(
            segments,
            vec![
                Segment::Plain("a "),
                Segment::Tag {
                    head: "{@b ",
                    name: "b",
                    body: "bold {@i x}"
                },
                Segment::Plain(" c"),
            ]
        );
    }

    #[test]
    fn test_split_unclosed_tag_is_plain() {
        assert_eq!(
            split_by_tags("a {@b open"),
            vec![Segment::Plain("a {@b open")]
        );
        let segments = split_by_tags("{@b open {@i x}");
        assert_eq!(segments[0], Segment::Plain("{@b open "));
        assert!(matches!(segments[1], Segment::Tag { name: "i", .. }));
    }

    #[test]
    fn test_split_empty_tag() {
        assert_eq!(
            split_by_tags("{@br}"),
            vec![Segment::Tag {
                head: "{@br",
                name: "br",
                body: ""
            }]
        );
    }

    #[test]
    fn test_rewrite_skips_blocking_tags() {
        let out = rewrite("a {@dice 1d6} {@b b}", &["dice"], &mut upper);
        assert_eq!(out, "A {@dice 1d6} {@b B}");
    }

    #[test]
    fn test_rewrite_skips_inside_nested_blocking() {
        let out = rewrite("{@dice x {@b y}}", &["dice"], &mut upper);
        assert_eq!(out, "{@dice x {@b y}}");
    }

    #[test]
    fn test_apply_matches_drops_overlaps() {
        let matches = vec![
            TagMatch {
                span: 0..3,
                kind: TagKind::Dice,
                replacement: "[a]".into(),
            },
            TagMatch {
                span: 2..5,
                kind: TagKind::Dice,
                replacement: "[b]".into(),
            },
        ];
        assert_eq!(apply_matches("abcdef", &matches), "[a]def");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("knocked {@condition prone} by {@b {@condition dazed|MyBrew}}"),
            "knocked prone by dazed"
        );
        assert_eq!(
            strip_tags("while {@status concentration||concentrating}"),
            "while concentrating"
        );
    }
}
