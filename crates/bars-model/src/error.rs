use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid response grade {0} (expected 0, 1 or 2)")]
    InvalidGrade(i64),
    #[error("unknown clinical domain '{0}'")]
    UnknownDomain(String),
    #[error("unknown timepoint '{0}'")]
    UnknownTimepoint(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
