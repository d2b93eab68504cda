//! Dashboard state: `Empty -> Loaded -> Cleaned`, reset to `Loaded` by each upload.

use chrono::{DateTime, Utc};

use crate::{
    data::{self, Dataset},
    error::SessionError,
    nlp::ConceptExtractor,
};

#[derive(Debug, Clone, Default)]
pub enum Session {
    #[default]
    Empty,
    Loaded {
        file_name: String,
        raw: Dataset,
    },
    Cleaned {
        file_name: String,
        raw: Dataset,
        cleaned: Dataset,
        cleaned_at: DateTime<Utc>,
    },
}

impl Session {
    /// Replace whatever is held with a freshly uploaded dataset.
    pub fn upload(&mut self, file_name: String, raw: Dataset) {
        *self = Session::Loaded { file_name, raw };
    }

    /// Forget the current dataset, e.g. after an unreadable upload.
    pub fn reset(&mut self) {
        *self = Session::Empty;
    }

    /// Raw dataset to clean; cleaning always starts from the upload, never from a prior result.
    pub fn raw(&self) -> Result<(&str, &Dataset), SessionError> {
        match self {
            Session::Empty => Err(SessionError::NoDataset),
            Session::Loaded { file_name, raw } | Session::Cleaned { file_name, raw, .. } => {
                Ok((file_name.as_str(), raw))
            }
        }
    }

    /// Record a finished cleaning run; only valid once a dataset is loaded.
    pub fn finish_clean(&mut self, cleaned: Dataset) -> Result<(), SessionError> {
        let (file_name, raw) = match std::mem::take(self) {
            Session::Empty => return Err(SessionError::NoDataset),
            Session::Loaded { file_name, raw } | Session::Cleaned { file_name, raw, .. } => {
                (file_name, raw)
            }
        };
        *self = Session::Cleaned {
            file_name,
            raw,
            cleaned,
            cleaned_at: Utc::now(),
        };
        Ok(())
    }

    /// Clean synchronously; on failure the state is left as it was.
    pub fn clean(&mut self, extractor: &ConceptExtractor) -> Result<(), SessionError> {
        let (_, raw) = self.raw()?;
        let cleaned = data::clean(raw, extractor)?;
        self.finish_clean(cleaned)
    }

    pub fn cleaned(&self) -> Result<&Dataset, SessionError> {
        match self {
            Session::Cleaned { cleaned, .. } => Ok(cleaned),
            _ => Err(SessionError::NotCleaned),
        }
    }

    pub fn phase(&self) -> &'static str {
        match self {
            Session::Empty => "empty",
            Session::Loaded { .. } => "loaded",
            Session::Cleaned { .. } => "cleaned",
        }
    }
}
