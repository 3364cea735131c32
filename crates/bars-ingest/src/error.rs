//! Error types for patient table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and validating a patient table.
///
/// Every variant is raised before any scoring takes place.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the input.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Unsupported text encoding (only UTF-8 is accepted).
    #[error("unsupported encoding {encoding} in {path}, save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parsing Errors ===
    /// The delimited text could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The input has no header row.
    #[error("input is empty: {path}")]
    EmptyInput { path: PathBuf },

    // === Validation Errors ===
    /// One or more required columns are absent.
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// Header present but no data rows.
    #[error("no patient rows in {path}")]
    EmptyDataset { path: PathBuf },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
