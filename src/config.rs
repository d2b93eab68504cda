//! Runtime configuration utilities for healthcare-cleaner.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Optional concept table replacing the built-in knowledge base.
    pub kb_path: Option<PathBuf>,
    /// Link abbreviation short forms through their defined long forms.
    pub resolve_abbreviations: bool,
    /// Minimum Jaro-Winkler similarity for fuzzy alias candidates.
    pub linker_threshold: f64,
    /// Maximum concepts linked for a single mention.
    pub max_entities_per_mention: usize,
    /// Rows shown in the raw and cleaned previews.
    pub preview_rows: usize,
    /// Rows shown in the suggested diagnoses table.
    pub suggestion_rows: usize,
    /// Largest accepted upload body.
    pub max_upload_bytes: usize,
    /// Root folder for cleaned outputs written by the CLI.
    pub outputs_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kb_path: None,
            resolve_abbreviations: true,
            linker_threshold: 0.85,
            max_entities_per_mention: 5,
            preview_rows: 5,
            suggestion_rows: 10,
            max_upload_bytes: 200 * 1024 * 1024,
            outputs_dir: PathBuf::from("./outputs"),
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let linker_threshold = parse_var("LINKER_THRESHOLD", defaults.linker_threshold);
        if !(0.0..=1.0).contains(&linker_threshold) {
            anyhow::bail!("LINKER_THRESHOLD must lie in [0, 1], got {linker_threshold}");
        }

        Ok(Self {
            kb_path: env::var("KB_PATH").ok().map(PathBuf::from),
            resolve_abbreviations: parse_var(
                "RESOLVE_ABBREVIATIONS",
                defaults.resolve_abbreviations,
            ),
            linker_threshold,
            max_entities_per_mention: parse_var(
                "MAX_ENTITIES_PER_MENTION",
                defaults.max_entities_per_mention,
            ),
            preview_rows: parse_var("PREVIEW_ROWS", defaults.preview_rows),
            suggestion_rows: parse_var("SUGGESTION_ROWS", defaults.suggestion_rows),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            outputs_dir: env::var("OUTPUTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.outputs_dir),
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
