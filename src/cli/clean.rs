//! CLI entry-point for cleaning a CSV file without the dashboard.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{self, Dataset, CLEANED_FILE_NAME, DIAGNOSIS_COLUMN},
    nlp::ConceptExtractor,
};

/// Args for the `clean` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV file with a TEXT column.
    #[arg(long)]
    pub input: PathBuf,
    /// Destination CSV; defaults to the outputs directory.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let extractor = ConceptExtractor::load(&settings)?;
    let raw = Dataset::from_path(&args.input)
        .with_context(|| format!("load {}", args.input.display()))?;
    info!(rows = raw.row_count(), "loaded dataset");

    let cleaned = data::clean(&raw, &extractor)?;

    let output = args
        .output
        .unwrap_or_else(|| settings.join_output(CLEANED_FILE_NAME));
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).context("creating output dir")?;
    }
    std::fs::write(&output, cleaned.to_csv_bytes()?)
        .with_context(|| format!("write {}", output.display()))?;
    info!(path = %output.display(), rows = cleaned.row_count(), "wrote cleaned dataset");

    if let Some(counts) = cleaned.value_counts(DIAGNOSIS_COLUMN)? {
        for (diagnosis, count) in counts {
            info!(%diagnosis, count, "diagnosis distribution");
        }
    }
    Ok(())
}
