//! Numeric observations with an explicit missing state.
//!
//! Raw input cells may be empty or non-numeric. Instead of carrying NaN through
//! the scoring rules, every observation is a [`Measurement`] that is either
//! present with a finite value or missing. Rules that need a value match on
//! `Present`, so a missing input can never satisfy a numeric comparison.

use serde::{Deserialize, Serialize};

/// One numeric observation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Measurement {
    /// A finite numeric value.
    Present(f64),
    /// Empty, non-numeric or non-finite input.
    #[default]
    Missing,
}

impl Measurement {
    /// Build a measurement from a raw value. Non-finite values are missing.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self::Present(value)
        } else {
            Self::Missing
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Present(value) => Some(value),
            Self::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn is_present(self) -> bool {
        !self.is_missing()
    }

    /// True when the value is present and exactly zero.
    pub fn is_zero(self) -> bool {
        matches!(self, Self::Present(value) if value == 0.0)
    }
}

impl From<Option<f64>> for Measurement {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::new)
    }
}

impl From<Measurement> for Option<f64> {
    fn from(value: Measurement) -> Self {
        value.value()
    }
}

impl From<f64> for Measurement {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// Baseline and follow-up observations of one clinical domain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PairedMeasurement {
    pub baseline: Measurement,
    pub follow_up: Measurement,
}

impl PairedMeasurement {
    pub fn new(baseline: impl Into<Measurement>, follow_up: impl Into<Measurement>) -> Self {
        Self {
            baseline: baseline.into(),
            follow_up: follow_up.into(),
        }
    }

    /// Both values, when both are present.
    pub fn both(self) -> Option<(f64, f64)> {
        Some((self.baseline.value()?, self.follow_up.value()?))
    }

    /// Follow-up minus baseline, when both are present.
    pub fn delta(self) -> Option<f64> {
        self.both().map(|(baseline, follow_up)| follow_up - baseline)
    }

    /// Relative reduction `(baseline - follow_up) / baseline`.
    ///
    /// Only defined for a strictly positive baseline and a present follow-up.
    pub fn reduction_ratio(self) -> Option<f64> {
        let (baseline, follow_up) = self.both()?;
        (baseline > 0.0).then(|| (baseline - follow_up) / baseline)
    }
}
