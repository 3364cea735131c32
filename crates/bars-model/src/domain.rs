//! Clinical domains, timepoints and the input column contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Column holding the patient identifier.
pub const PATIENT_ID_COLUMN: &str = "Patient ID";

/// Column holding the treatment (biologic) group label.
pub const TREATMENT_COLUMN: &str = "Treatment";

/// Every column an input table must provide (case-sensitive).
pub const REQUIRED_COLUMNS: [&str; 8] = [
    PATIENT_ID_COLUMN,
    "OCS_BL",
    "ACT_BL",
    "Exacerbation_BL",
    TREATMENT_COLUMN,
    "OCS_FU",
    "ACT_FU",
    "Exacerbation_FU",
];

/// The three clinical domains scored by BARS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClinicalDomain {
    /// Oral corticosteroid maintenance dose.
    Ocs,
    /// Asthma Control Test score (5-25).
    Act,
    /// Exacerbations during the last 12 months.
    Exacerbation,
}

impl ClinicalDomain {
    /// All domains in reporting order.
    pub const ALL: [ClinicalDomain; 3] = [Self::Ocs, Self::Act, Self::Exacerbation];

    /// Column prefix used in the input table (`OCS`, `ACT`, `Exacerbation`).
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Ocs => "OCS",
            Self::Act => "ACT",
            Self::Exacerbation => "Exacerbation",
        }
    }

    /// Name of the score column in the scored table.
    pub fn score_column(self) -> &'static str {
        match self {
            Self::Ocs => "OCS_score",
            Self::Act => "ACT_score",
            Self::Exacerbation => "Exacerbation_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ocs => "Oral corticosteroid dose",
            Self::Act => "Asthma Control Test",
            Self::Exacerbation => "Exacerbations (12 months)",
        }
    }

    /// Input column for the given timepoint, e.g. `OCS_BL`.
    pub fn column(self, timepoint: Timepoint) -> &'static str {
        match (self, timepoint) {
            (Self::Ocs, Timepoint::Baseline) => "OCS_BL",
            (Self::Ocs, Timepoint::FollowUp) => "OCS_FU",
            (Self::Act, Timepoint::Baseline) => "ACT_BL",
            (Self::Act, Timepoint::FollowUp) => "ACT_FU",
            (Self::Exacerbation, Timepoint::Baseline) => "Exacerbation_BL",
            (Self::Exacerbation, Timepoint::FollowUp) => "Exacerbation_FU",
        }
    }
}

impl fmt::Display for ClinicalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for ClinicalDomain {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|domain| domain.prefix().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownDomain(trimmed.to_string()))
    }
}

/// Measurement timepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Timepoint {
    Baseline,
    FollowUp,
}

impl Timepoint {
    pub const ALL: [Timepoint; 2] = [Self::Baseline, Self::FollowUp];

    /// Column suffix (`BL` / `FU`).
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Baseline => "BL",
            Self::FollowUp => "FU",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Baseline => "Baseline",
            Self::FollowUp => "Follow-up",
        }
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Timepoint {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BL" | "BASELINE" => Ok(Self::Baseline),
            "FU" | "FOLLOW-UP" | "FOLLOWUP" => Ok(Self::FollowUp),
            other => Err(ModelError::UnknownTimepoint(other.to_string())),
        }
    }
}

/// Human-readable description of a required input column.
pub fn column_description(column: &str) -> Option<&'static str> {
    let description = match column {
        PATIENT_ID_COLUMN => "Unique identifier per patient",
        TREATMENT_COLUMN => "Biologic/therapy group label (used for group means)",
        "OCS_BL" => "Oral corticosteroid dose at baseline",
        "OCS_FU" => "Oral corticosteroid dose at follow-up",
        "ACT_BL" => "Asthma Control Test score at baseline",
        "ACT_FU" => "Asthma Control Test score at follow-up",
        "Exacerbation_BL" => "Exacerbations during the 12 months before baseline",
        "Exacerbation_FU" => "Exacerbations during the 12 months before follow-up",
        _ => return None,
    };
    Some(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_prefix_and_suffix() {
        for domain in ClinicalDomain::ALL {
            for timepoint in Timepoint::ALL {
                assert_eq!(
                    domain.column(timepoint),
                    format!("{}_{}", domain.prefix(), timepoint.suffix())
                );
            }
        }
    }

    #[test]
    fn every_required_column_is_described() {
        for column in REQUIRED_COLUMNS {
            assert!(column_description(column).is_some(), "{column}");
        }
        assert!(column_description("Age").is_none());
    }

    #[test]
    fn parses_domain_prefixes() {
        assert_eq!("ocs".parse::<ClinicalDomain>(), Ok(ClinicalDomain::Ocs));
        assert_eq!(
            "Exacerbation".parse::<ClinicalDomain>(),
            Ok(ClinicalDomain::Exacerbation)
        );
        assert!("FEV1".parse::<ClinicalDomain>().is_err());
        assert_eq!("fu".parse::<Timepoint>(), Ok(Timepoint::FollowUp));
    }
}
