//! Patient table ingestion for BARS.
//!
//! This crate loads a CSV or TSV patient table into [`PatientRecord`]s:
//!
//! - **Validation**: size limit, UTF-8 encoding, required columns (all missing
//!   names are reported together), at least one data row
//! - **Parsing**: every cell is read as text through Polars
//! - **Coercion**: numeric columns are parsed leniently; anything that is not a
//!   finite number becomes missing
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use bars_ingest::{IngestOptions, read_patient_table};
//!
//! let table = read_patient_table(Path::new("patients.csv"), &IngestOptions::default())?;
//! println!("{} patients", table.len());
//! ```
//!
//! [`PatientRecord`]: bars_model::PatientRecord

mod coerce;
mod error;
mod input;
mod records;

// === Error Types ===
pub use error::{IngestError, Result};

// === Reading ===
pub use input::{
    Delimiter, IngestOptions, MAX_INPUT_SIZE, check_file_size, missing_columns,
    normalize_header, read_headers, read_patient_table, read_patient_table_from_reader,
    validate_columns, validate_encoding,
};

// === Records ===
pub use coerce::coerce_measurement;
pub use records::{PatientTable, records_from_frame, template_frame};
