use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Ordinal response category shared by the domain scores and the overall
/// response score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub enum ResponseGrade {
    /// 0: poor or no response.
    Poor = 0,
    /// 1: partial response.
    Partial = 1,
    /// 2: good response.
    Good = 2,
}

impl ResponseGrade {
    pub const ALL: [ResponseGrade; 3] = [Self::Poor, Self::Partial, Self::Good];

    pub const fn as_i64(self) -> i64 {
        self as i64
    }

    pub const fn as_f64(self) -> f64 {
        self as i64 as f64
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Poor => "Poor / no response",
            Self::Partial => "Partial response",
            Self::Good => "Good response",
        }
    }
}

impl TryFrom<i64> for ResponseGrade {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Poor),
            1 => Ok(Self::Partial),
            2 => Ok(Self::Good),
            other => Err(ModelError::InvalidGrade(other)),
        }
    }
}

impl From<ResponseGrade> for i64 {
    fn from(value: ResponseGrade) -> Self {
        value.as_i64()
    }
}

impl fmt::Display for ResponseGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grades_are_ordinal() {
        assert!(ResponseGrade::Poor < ResponseGrade::Partial);
        assert!(ResponseGrade::Partial < ResponseGrade::Good);
        assert_eq!(ResponseGrade::Good.as_f64(), 2.0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(ResponseGrade::try_from(1), Ok(ResponseGrade::Partial));
        assert_eq!(ResponseGrade::try_from(3), Err(ModelError::InvalidGrade(3)));
    }
}
