//! Slope charts of treatment group means.

use bars_model::{ClinicalDomain, GroupSummary, Timepoint};

pub const X_BASELINE: f64 = 1.0;
pub const X_FOLLOW_UP: f64 = 3.0;
pub const X_RANGE: (f64, f64) = (0.0, 4.0);

/// Direction of a group's change from baseline to follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Follow-up mean at or above the baseline mean (drawn green).
    Up,
    /// Follow-up mean below the baseline mean (drawn red).
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlopeLine {
    pub label: String,
    pub before: f64,
    pub after: f64,
}

impl SlopeLine {
    pub fn trend(&self) -> Trend {
        if self.after >= self.before {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    pub fn left_label(&self) -> String {
        format!("{}, {:.2}", self.label, self.before)
    }

    pub fn right_label(&self) -> String {
        format!("{}, {:.2}", self.label, self.after)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlopeChart {
    pub domain: ClinicalDomain,
    pub title: String,
    pub lines: Vec<SlopeLine>,
    pub y_min: f64,
    pub y_max: f64,
}

impl SlopeChart {
    /// Axis tick labels at `X_BASELINE` and `X_FOLLOW_UP`.
    pub fn tick_labels(&self) -> [&'static str; 2] {
        Timepoint::ALL.map(|timepoint| self.domain.column(timepoint))
    }
}

fn title_for(domain: ClinicalDomain) -> String {
    let name = match domain {
        ClinicalDomain::Ocs => "OCS",
        ClinicalDomain::Act => "ACT",
        ClinicalDomain::Exacerbation => "Exacerbations",
    };
    format!("Slope Chart of Means by Biologic: {name}")
}

/// Lines in summary order with y-limits padded by `max(1, 8% of range)`.
pub fn slope_chart(summary: &GroupSummary) -> SlopeChart {
    let lines: Vec<SlopeLine> = summary
        .groups
        .iter()
        .map(|group| SlopeLine {
            label: group.treatment.clone(),
            before: group.mean_before,
            after: group.mean_after,
        })
        .collect();

    let values = lines.iter().flat_map(|line| [line.before, line.after]);
    let (y_min, y_max) = match (values.clone().reduce(f64::min), values.reduce(f64::max)) {
        (Some(low), Some(high)) => {
            let pad = (0.08 * (high - low)).max(1.0);
            (low - pad, high + pad)
        }
        _ => (0.0, 1.0),
    };

    SlopeChart {
        domain: summary.domain,
        title: title_for(summary.domain),
        lines,
        y_min,
        y_max,
    }
}
