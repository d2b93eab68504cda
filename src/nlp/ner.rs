//! Dictionary-based entity recogniser driven by knowledge-base aliases.

use std::collections::HashMap;

use crate::nlp::{
    kb::KnowledgeBase,
    text::{tokenize, Token},
};

/// Extracted entity span with offsets relative to the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
    pub score: f64,
}

/// Trait for NER implementations.
pub trait Ner: Send + Sync {
    fn extract(&self, text: &str) -> Vec<Span>;
}

const ENTITY_LABEL: &str = "ENTITY";
const EXACT_SCORE: f64 = 1.0;
const INFLECTED_SCORE: f64 = 0.8;

/// Greedy longest-match recogniser over tokenised aliases.
pub struct DictionaryNer {
    /// Alias token sequences keyed by first token, longest first.
    by_first_token: HashMap<String, Vec<Vec<String>>>,
}

impl DictionaryNer {
    pub fn from_kb(kb: &KnowledgeBase) -> Self {
        let mut by_first_token: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for (alias, _) in kb.aliases() {
            let tokens: Vec<String> = alias.split(' ').map(str::to_string).collect();
            if let Some(first) = tokens.first() {
                by_first_token.entry(first.clone()).or_default().push(tokens);
            }
        }
        for candidates in by_first_token.values_mut() {
            candidates.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        }
        Self { by_first_token }
    }

    /// Number of tokens matched at `tokens[0..]`, with the inflection flag.
    fn longest_match(&self, tokens: &[Token]) -> Option<(usize, bool)> {
        let first = tokens.first()?;
        let mut best = None;
        for candidates in self.candidates_for(&first.lower) {
            for alias in candidates {
                if alias.len() > tokens.len() {
                    continue;
                }
                if let Some(inflected) = matches_alias(&tokens[..alias.len()], alias) {
                    let better = match best {
                        Some((len, was_inflected)) => {
                            alias.len() > len || (alias.len() == len && was_inflected && !inflected)
                        }
                        None => true,
                    };
                    if better {
                        best = Some((alias.len(), inflected));
                    }
                }
            }
        }
        best
    }

    /// Alias buckets whose first token could match `lower`, including singular stems.
    fn candidates_for<'a>(
        &'a self,
        lower: &'a str,
    ) -> impl Iterator<Item = &'a Vec<Vec<String>>> + 'a {
        singular_stems(lower)
            .into_iter()
            .filter_map(move |stem| self.by_first_token.get(stem))
    }
}

impl Ner for DictionaryNer {
    fn extract(&self, text: &str) -> Vec<Span> {
        let tokens = tokenize(text);
        let mut spans = Vec::new();
        let mut idx = 0;
        while idx < tokens.len() {
            match self.longest_match(&tokens[idx..]) {
                Some((len, inflected)) => {
                    let start = tokens[idx].start;
                    let end = tokens[idx + len - 1].end;
                    spans.push(Span {
                        start,
                        end,
                        label: ENTITY_LABEL.to_string(),
                        text: text[start..end].to_string(),
                        score: if inflected { INFLECTED_SCORE } else { EXACT_SCORE },
                    });
                    idx += len;
                }
                None => idx += 1,
            }
        }
        spans
    }
}

/// `Some(inflected)` when the tokens spell the alias; only the last token may carry a plural suffix.
fn matches_alias(tokens: &[Token], alias: &[String]) -> Option<bool> {
    let last = alias.len() - 1;
    let mut inflected = false;
    for (pos, (token, word)) in tokens.iter().zip(alias).enumerate() {
        if token.lower == *word {
            continue;
        }
        if pos == last && singular_stems(&token.lower).contains(&word.as_str()) {
            inflected = true;
            continue;
        }
        return None;
    }
    Some(inflected)
}

/// The word itself followed by candidate singular forms.
fn singular_stems(word: &str) -> Vec<&str> {
    let mut stems = vec![word];
    if word.len() > 3 {
        if let Some(stem) = word.strip_suffix("es") {
            stems.push(stem);
        }
        if let Some(stem) = word.strip_suffix('s') {
            stems.push(stem);
        }
    }
    stems
}
