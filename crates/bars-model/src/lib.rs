//! Data model for biologic asthma response scoring (BARS).
//!
//! This crate holds the types shared by ingestion, scoring and reporting:
//!
//! - [`measurement`]: numeric observations with an explicit missing state
//! - [`domain`]: the three clinical domains, timepoints and the input column contract
//! - [`patient`]: the raw patient record (one row of input)
//! - [`grade`]: the ordinal response grade used by every score
//! - [`scored`]: a patient record together with its derived scores
//! - [`summary`]: per-treatment mean values for one domain
//!
//! Nothing here performs I/O or scoring; the types only carry data between the
//! other crates.

pub mod domain;
pub mod error;
pub mod grade;
pub mod measurement;
pub mod patient;
pub mod scored;
pub mod summary;

pub use domain::{
    ClinicalDomain, PATIENT_ID_COLUMN, REQUIRED_COLUMNS, TREATMENT_COLUMN, Timepoint,
    column_description,
};
pub use error::{ModelError, Result};
pub use grade::ResponseGrade;
pub use measurement::{Measurement, PairedMeasurement};
pub use patient::{PatientRecord, REDACTED_VALUE, redact};
pub use scored::{DomainGrades, ScoredRecord};
pub use summary::{GroupMeans, GroupSummary};
