//! Title casing
//!
//! The line classifier decides "is this a heading" by asking whether a line is already in
//! title case. Title case here means: the first letter of every word upper-cased and the rest
//! lower-cased, except stop words (lower-cased unless they open the line) and a short list of
//! acronyms that keep their capitals.
//!
//! Words are runs that start with an alphanumeric character and continue until whitespace,
//! `-` or `/`, so `Half-elf` becomes `Half-Elf` and `d6` becomes `D6`.

/// Words kept lower case inside a title.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "for", "nor", "as", "at", "by", "from", "in", "into",
    "near", "of", "on", "onto", "to", "with", "over", "von", "via",
];

/// Acronyms that stay upper case inside a title.
const UPPERCASE_WORDS: &[&str] = &[
    "ID", "TV", "DM", "OK", "NPC", "PC", "TPK", "DC", "AC", "HP", "XP", "CR",
];

/// Check whether a word (ignoring case and trailing punctuation) is a title stop word.
pub fn is_stop_word(word: &str) -> bool {
    let core = word.trim_end_matches(|c: char| !c.is_alphanumeric());
    STOP_WORDS.iter().any(|stop| stop.eq_ignore_ascii_case(core))
}

/// Convert text to title case.
pub fn to_title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    let mut index = 0;

    for ch in text.chars() {
        if word.is_empty() {
            if ch.is_alphanumeric() {
                word.push(ch);
            } else {
                out.push(ch);
            }
            continue;
        }
        if ch.is_whitespace() || ch == '-' || ch == '/' {
            out.push_str(&title_case_word(&word, index == 0));
            index += 1;
            word.clear();
            out.push(ch);
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        out.push_str(&title_case_word(&word, index == 0));
    }
    out
}

/// Returns `true` when the text is unchanged by [`to_title_case`].
pub fn is_title_case(text: &str) -> bool {
    to_title_case(text) == text
}

fn title_case_word(word: &str, is_first: bool) -> String {
    let core = word.trim_end_matches(|c: char| !c.is_alphanumeric());
    if let Some(upper) = UPPERCASE_WORDS
        .iter()
        .find(|acronym| acronym.eq_ignore_ascii_case(core))
    {
        return format!("{}{}", upper, &word[core.len()..]);
    }
    if !is_first && is_stop_word(core) {
        return word.to_lowercase();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
