//! Tokenisation shared by the recogniser, the linker and the knowledge base.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("valid regex"));

/// Word token with byte offsets into the source text and a lower-cased form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub lower: String,
}

/// Split text into alphanumeric word tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    WORD.find_iter(text)
        .map(|m| Token {
            start: m.start(),
            end: m.end(),
            lower: m.as_str().to_lowercase(),
        })
        .collect()
}

/// Lower-case a term and fold every run of punctuation or whitespace into one space.
pub fn normalize_term(term: &str) -> String {
    tokenize(term)
        .into_iter()
        .map(|t| t.lower)
        .collect::<Vec<_>>()
        .join(" ")
}
