//! Inline tokens
//!
//! Delimiter runs are matched longest first, so `***` is one token rather than three.

use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    #[token("***")]
    TripleStar,
    #[token("**")]
    DoubleStar,
    #[token("__")]
    DoubleUnderscore,
    #[token("*")]
    Star,
    #[token("_")]
    Underscore,
    #[token("`")]
    Backtick,

    /// Backslash followed by the character it escapes.
    #[regex(r"\\.")]
    Escape,
    /// Trailing backslash with nothing to escape.
    #[token("\\")]
    Backslash,

    #[regex(r"[^*_`\\]+")]
    Text,
}

impl Token {
    /// The delimiter string this token stands for, if it is one.
    pub fn delimiter(self) -> Option<&'static str> {
        match self {
            Token::TripleStar => Some("***"),
            Token::DoubleStar => Some("**"),
            Token::DoubleUnderscore => Some("__"),
            Token::Star => Some("*"),
            Token::Underscore => Some("_"),
            Token::Backtick => Some("`"),
            Token::Escape | Token::Backslash | Token::Text => None,
        }
    }
}

/// Tokenize a string, keeping each token's source slice.
///
/// Input the token set cannot match is returned as [`Token::Text`].
pub fn tokenize(source: &str) -> Vec<(Token, &str)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        tokens.push((result.unwrap_or(Token::Text), lexer.slice()));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_runs_are_longest_match() {
        let tokens: Vec<Token> = tokenize("***a** b*").into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::TripleStar,
                Token::Text,
                Token::DoubleStar,
                Token::Text,
                Token::Star
            ]
        );
    }

    #[test]
    fn test_escape_keeps_slice() {
        let tokens = tokenize(r"a\*b");
        assert_eq!(
            tokens,
            vec![(Token::Text, "a"), (Token::Escape, r"\*"), (Token::Text, "b")]
        );
    }

    #[test]
    fn test_trailing_backslash() {
        let tokens = tokenize("a\\");
        assert_eq!(tokens, vec![(Token::Text, "a"), (Token::Backslash, "\\")]);
    }
}
