//! Domain error types shared by the cleaner, the knowledge base and the dashboard.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures while loading, inspecting or augmenting a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unable to parse CSV input: {0}")]
    Parse(#[source] PolarsError),

    #[error("dataset has no columns")]
    NoColumns,

    #[error("dataset has no `{0}` column")]
    MissingColumn(String),

    #[error("column `{column}` must hold text but has type {dtype}")]
    NonTextColumn { column: String, dtype: String },

    #[error("column `{column}` has no value at row {row}")]
    NullValue { column: String, row: usize },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Failures while building the concept knowledge base.
#[derive(Debug, Error)]
pub enum KnowledgeBaseError {
    #[error("unable to read concept table {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: csv::Error,
    },

    #[error("concept table row {row} has an empty `{field}`")]
    EmptyField { row: usize, field: &'static str },

    #[error("knowledge base contains no concepts")]
    Empty,
}

/// Dashboard actions attempted in the wrong state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("upload a CSV file before cleaning")]
    NoDataset,

    #[error("clean the dataset before downloading")]
    NotCleaned,

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
