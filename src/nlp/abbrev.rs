//! Abbreviation detection for `long form (SF)` definitions.
//!
//! Long forms are recovered by aligning the short form's characters backwards
//! against the words preceding the parenthesis, as in Schwartz & Hearst (2003).

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*([^()]{1,12}?)\s*\)").expect("valid regex"));

const MAX_SHORT_FORM_CHARS: usize = 10;

/// A short form defined in the text together with the long form it abbreviates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviation {
    pub short_form: String,
    pub long_form: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AbbreviationDetector;

impl AbbreviationDetector {
    /// Abbreviations defined in `text`; the first definition of a short form wins.
    pub fn detect(&self, text: &str) -> Vec<Abbreviation> {
        let mut found: IndexMap<String, String> = IndexMap::new();
        for caps in PARENTHETICAL.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let short = inner.as_str();
            if !is_short_form(short) || found.contains_key(short) {
                continue;
            }
            let candidate = preceding_words(&text[..whole.start()], short.chars().count());
            if let Some(long) = best_long_form(short, &candidate) {
                if long.chars().count() > short.chars().count() {
                    found.insert(short.to_string(), long);
                }
            }
        }
        found
            .into_iter()
            .map(|(short_form, long_form)| Abbreviation {
                short_form,
                long_form,
            })
            .collect()
    }

    /// Byte ranges of every word-bounded occurrence of `short_form` in `text`.
    pub fn occurrences(&self, text: &str, short_form: &str) -> Vec<(usize, usize)> {
        let pattern = format!(r"\b{}\b", regex::escape(short_form));
        match Regex::new(&pattern) {
            Ok(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn is_short_form(candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    let (Some(first), Some(last)) = (chars.first(), chars.last()) else {
        return false;
    };
    (2..=MAX_SHORT_FORM_CHARS).contains(&chars.len())
        && first.is_alphanumeric()
        && last.is_alphanumeric()
        && candidate.split_whitespace().count() <= 2
        && chars.iter().any(|c| c.is_uppercase())
}

/// The last `min(n + 5, 2n)` words before the parenthesis, within the current sentence.
fn preceding_words(prefix: &str, short_len: usize) -> String {
    let sentence = prefix
        .rfind(['.', ';', ':', '!', '?'])
        .map(|idx| &prefix[idx + 1..])
        .unwrap_or(prefix);
    let window = (short_len + 5).min(short_len * 2);
    let words: Vec<&str> = sentence.split_whitespace().collect();
    let skip = words.len().saturating_sub(window);
    words[skip..].join(" ")
}

fn best_long_form(short: &str, long: &str) -> Option<String> {
    let s: Vec<char> = short.chars().collect();
    let l: Vec<char> = long.chars().collect();
    let mut s_idx = s.len() as isize - 1;
    let mut l_idx = l.len() as isize - 1;

    while s_idx >= 0 {
        let current = lower(s[s_idx as usize]);
        if !current.is_alphanumeric() {
            s_idx -= 1;
            continue;
        }
        // the first short-form character must open a word
        while l_idx >= 0
            && (lower(l[l_idx as usize]) != current
                || (s_idx == 0 && l_idx > 0 && l[l_idx as usize - 1].is_alphanumeric()))
        {
            l_idx -= 1;
        }
        if l_idx < 0 {
            return None;
        }
        l_idx -= 1;
        s_idx -= 1;
    }

    let upto = (l_idx + 1) as usize;
    let start = l[..upto]
        .iter()
        .rposition(|c| *c == ' ')
        .map(|pos| pos + 1)
        .unwrap_or(0);
    let long_form: String = l[start..].iter().collect();
    let long_form = long_form.trim().to_string();
    (!long_form.is_empty()).then_some(long_form)
}

fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
