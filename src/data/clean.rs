//! Annotate every row's clinical note with its linked concepts.

use tracing::info;

use crate::{data::dataset::Dataset, error::DatasetError, nlp::ConceptExtractor};

/// Column holding the free-text note.
pub const TEXT_COLUMN: &str = "TEXT";
/// Optional recorded diagnosis, used for the distribution chart.
pub const DIAGNOSIS_COLUMN: &str = "DIAGNOSIS";
/// Column appended by [`clean`].
pub const SUGGESTED_COLUMN: &str = "SUGGESTED_DIAGNOSIS";
/// File name offered for the cleaned download.
pub const CLEANED_FILE_NAME: &str = "cleaned_healthcare_data.csv";

/// Return a copy of `dataset` with a `SUGGESTED_DIAGNOSIS` summary per row.
///
/// Every summary is computed before the column is attached, so a failure
/// leaves nothing behind.
pub fn clean(dataset: &Dataset, extractor: &ConceptExtractor) -> Result<Dataset, DatasetError> {
    let texts = dataset.text_values(TEXT_COLUMN)?;
    let summaries: Vec<String> = texts.iter().map(|text| extractor.extract(text)).collect();
    let cleaned = dataset.with_column(SUGGESTED_COLUMN, summaries)?;
    info!(
        rows = cleaned.row_count(),
        columns = cleaned.column_names().len(),
        "cleaned dataset"
    );
    Ok(cleaned)
}
