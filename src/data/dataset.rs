//! Tabular dataset backed by a polars `DataFrame`.

use std::{io::Cursor, path::Path};

use indexmap::IndexMap;
use polars::prelude::{
    CsvReadOptions, CsvWriter, DataFrame, DataType, NamedFrom, SerReader, SerWriter, Series,
};
use serde::Serialize;

use crate::error::DatasetError;

/// First rows of a dataset rendered as strings; nulls render empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Ordered rows of named columns loaded from a delimited file.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Parse CSV bytes with a header row; column types are inferred from every row.
    pub fn from_csv_bytes(bytes: Vec<u8>) -> Result<Self, DatasetError> {
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(DatasetError::Parse)?;
        if frame.width() == 0 {
            return Err(DatasetError::NoColumns);
        }
        Ok(Self { frame })
    }

    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_bytes(bytes)
    }

    /// Serialise to UTF-8 CSV with a header row and no index column.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, DatasetError> {
        let mut frame = self.frame.clone();
        let mut buf = Vec::new();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(&mut frame)?;
        Ok(buf)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Every value of a text column; a missing column, non-text type or null cell is an error.
    pub fn text_values(&self, column: &str) -> Result<Vec<&str>, DatasetError> {
        let series = self
            .frame
            .column(column)
            .map_err(|_| DatasetError::MissingColumn(column.to_string()))?;
        if series.dtype() != &DataType::String {
            return Err(DatasetError::NonTextColumn {
                column: column.to_string(),
                dtype: series.dtype().to_string(),
            });
        }
        series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| DatasetError::NullValue {
                    column: column.to_string(),
                    row,
                })
            })
            .collect()
    }

    /// Copy of the dataset with `name` appended, or replaced when it already exists.
    pub fn with_column(&self, name: &str, values: Vec<String>) -> Result<Self, DatasetError> {
        let mut frame = self.frame.clone();
        frame.with_column(Series::new(name.into(), values))?;
        Ok(Self { frame })
    }

    pub fn preview(&self, rows: usize) -> Result<Preview, DatasetError> {
        let columns = self.column_names();
        let names: Vec<&str> = columns.iter().map(String::as_str).collect();
        self.preview_columns(&names, rows)
    }

    pub fn preview_columns(&self, columns: &[&str], rows: usize) -> Result<Preview, DatasetError> {
        let head = self.frame.head(Some(rows));
        let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(columns.len()); head.height()];
        for name in columns {
            let series = head
                .column(name)
                .map_err(|_| DatasetError::MissingColumn(name.to_string()))?
                .cast(&DataType::String)?;
            for (row, value) in series.str()?.into_iter().enumerate() {
                cells[row].push(value.unwrap_or_default().to_string());
            }
        }
        Ok(Preview {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: cells,
        })
    }

    /// Distinct non-null values by descending frequency, ties in order of first appearance.
    pub fn value_counts(&self, column: &str) -> Result<Option<Vec<(String, usize)>>, DatasetError> {
        let Ok(series) = self.frame.column(column) else {
            return Ok(None);
        };
        let series = series.cast(&DataType::String)?;
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for value in series.str()?.into_iter().flatten() {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(Some(ranked))
    }
}
