//! Concept linking from entity mentions to knowledge-base identifiers.

use std::cmp::Ordering;

use indexmap::IndexMap;
use strsim::jaro_winkler;

use crate::nlp::{kb::KnowledgeBase, text::normalize_term};

/// A candidate concept for a mention.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub cui: String,
    pub score: f64,
}

/// Trait for concept linkers.
pub trait Linker: Send + Sync {
    /// Ranked candidate concepts for a mention, best first.
    fn candidates(&self, mention: &str) -> Vec<Candidate>;

    /// Knowledge base the candidate identifiers resolve against.
    fn kb(&self) -> &KnowledgeBase;
}

/// Exact alias lookup with a Jaro-Winkler fallback over every alias.
pub struct AliasLinker {
    kb: KnowledgeBase,
    threshold: f64,
    max_candidates: usize,
}

impl AliasLinker {
    pub fn new(kb: KnowledgeBase, threshold: f64, max_candidates: usize) -> Self {
        Self {
            kb,
            threshold,
            max_candidates,
        }
    }

    fn fuzzy(&self, key: &str) -> Vec<Candidate> {
        let mut best: IndexMap<&str, f64> = IndexMap::new();
        for (alias, cuis) in self.kb.aliases() {
            let score = jaro_winkler(key, alias);
            if score < self.threshold {
                continue;
            }
            for cui in cuis {
                let entry = best.entry(cui.as_str()).or_insert(score);
                if score > *entry {
                    *entry = score;
                }
            }
        }
        let mut ranked: Vec<Candidate> = best
            .into_iter()
            .map(|(cui, score)| Candidate {
                cui: cui.to_string(),
                score,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.cui.cmp(&b.cui))
        });
        ranked
    }
}

impl Linker for AliasLinker {
    fn candidates(&self, mention: &str) -> Vec<Candidate> {
        let key = normalize_term(mention);
        if key.is_empty() || self.max_candidates == 0 {
            return Vec::new();
        }
        let exact = self.kb.cuis_for_alias(&key);
        let mut candidates = if exact.is_empty() {
            self.fuzzy(&key)
        } else {
            exact
                .iter()
                .map(|cui| Candidate {
                    cui: cui.clone(),
                    score: 1.0,
                })
                .collect()
        };
        candidates.truncate(self.max_candidates);
        candidates
    }

    fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }
}
