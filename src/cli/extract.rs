//! CLI entry-point for extracting concepts from one note.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    api::types::ExtractResponse,
    config::Settings,
    nlp::{self, ConceptExtractor},
};

/// Args for the `extract` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Free-text clinical note.
    #[arg(long)]
    pub text: String,
    /// Print the summary and concept list as JSON.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let extractor = ConceptExtractor::load(&settings)?;
    let concepts = extractor.concepts(&args.text);
    if args.json {
        let response = ExtractResponse {
            summary: nlp::summarize(&concepts),
            concepts,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", nlp::summarize(&concepts));
    }
    Ok(())
}
