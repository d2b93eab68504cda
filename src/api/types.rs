//! Shared DTOs for JSON requests and responses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub summary: String,
    pub concepts: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateDto {
    pub phase: String,
    pub file_name: Option<String>,
    pub rows: Option<usize>,
    pub columns: Vec<String>,
    pub cleaned_at: Option<String>,
}
