//! Annotate clinical notes in tabular datasets with linked medical concepts.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
