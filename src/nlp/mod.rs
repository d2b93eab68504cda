//! Concept extraction: entity recognition, abbreviation resolution and concept linking.

pub mod abbrev;
pub mod kb;
pub mod linker;
pub mod ner;
pub mod text;

use std::sync::Arc;

use anyhow::{Context, Result};
use indexmap::IndexSet;
use tracing::info;

use crate::config::Settings;

use self::{
    abbrev::AbbreviationDetector,
    kb::KnowledgeBase,
    linker::{AliasLinker, Linker},
    ner::{DictionaryNer, Ner, Span},
};

/// Summary returned when a text yields no linked concepts.
pub const NO_TERMS_SENTINEL: &str = "No medical terms found";

/// A recognised span and the text used to link it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    pub span: Span,
    /// Long form for abbreviation occurrences, the span text otherwise.
    pub query: String,
}

/// Immutable extraction service shared across the process.
pub struct ConceptExtractor {
    ner: Arc<dyn Ner>,
    linker: Arc<dyn Linker>,
    abbreviations: Option<AbbreviationDetector>,
}

impl ConceptExtractor {
    pub fn new(ner: Arc<dyn Ner>, linker: Arc<dyn Linker>, resolve_abbreviations: bool) -> Self {
        Self {
            ner,
            linker,
            abbreviations: resolve_abbreviations.then_some(AbbreviationDetector),
        }
    }

    /// Build the recogniser and linker from the configured knowledge base.
    pub fn load(settings: &Settings) -> Result<Self> {
        let kb = match &settings.kb_path {
            Some(path) => KnowledgeBase::from_csv_path(path)
                .with_context(|| format!("load knowledge base {}", path.display()))?,
            None => KnowledgeBase::builtin(),
        };
        info!(
            concepts = kb.len(),
            aliases = kb.alias_count(),
            abbreviations = settings.resolve_abbreviations,
            "initialised concept extractor"
        );
        Ok(Self::from_kb(kb, settings))
    }

    pub fn from_kb(kb: KnowledgeBase, settings: &Settings) -> Self {
        let ner = Arc::new(DictionaryNer::from_kb(&kb)) as Arc<dyn Ner>;
        let linker = Arc::new(AliasLinker::new(
            kb,
            settings.linker_threshold,
            settings.max_entities_per_mention,
        )) as Arc<dyn Linker>;
        Self::new(ner, linker, settings.resolve_abbreviations)
    }

    /// Recognised mentions ordered by position.
    pub fn mentions(&self, text: &str) -> Vec<Mention> {
        let mut mentions: Vec<Mention> = self
            .ner
            .extract(text)
            .into_iter()
            .map(|span| Mention {
                query: span.text.clone(),
                span,
            })
            .collect();

        if let Some(detector) = &self.abbreviations {
            for abbreviation in detector.detect(text) {
                for (start, end) in detector.occurrences(text, &abbreviation.short_form) {
                    if let Some(existing) = mentions
                        .iter_mut()
                        .find(|m| m.span.start == start && m.span.end == end)
                    {
                        existing.query = abbreviation.long_form.clone();
                        continue;
                    }
                    let overlaps = mentions
                        .iter()
                        .any(|m| m.span.start < end && start < m.span.end);
                    if !overlaps {
                        mentions.push(Mention {
                            span: Span {
                                start,
                                end,
                                label: "ABBREVIATION".to_string(),
                                text: text[start..end].to_string(),
                                score: 1.0,
                            },
                            query: abbreviation.long_form.clone(),
                        });
                    }
                }
            }
            mentions.sort_by_key(|m| m.span.start);
        }
        mentions
    }

    /// Distinct canonical concept names in order of first occurrence.
    pub fn concepts(&self, text: &str) -> Vec<String> {
        let kb = self.linker.kb();
        let mut names = IndexSet::new();
        for mention in self.mentions(text) {
            for candidate in self.linker.candidates(&mention.query) {
                if let Some(entity) = kb.entity(&candidate.cui) {
                    names.insert(entity.canonical_name.clone());
                }
            }
        }
        names.into_iter().collect()
    }

    /// Comma-joined concept names, or [`NO_TERMS_SENTINEL`] when none are found.
    pub fn extract(&self, text: &str) -> String {
        summarize(&self.concepts(text))
    }
}

/// Join concept names with ", ", falling back to [`NO_TERMS_SENTINEL`].
pub fn summarize(concepts: &[String]) -> String {
    if concepts.is_empty() {
        NO_TERMS_SENTINEL.to_string()
    } else {
        concepts.join(", ")
    }
}
