//! Dataset loading and cleaning layer.

pub mod clean;
pub mod dataset;

pub use clean::{clean, CLEANED_FILE_NAME, DIAGNOSIS_COLUMN, SUGGESTED_COLUMN, TEXT_COLUMN};
pub use dataset::{Dataset, Preview};
