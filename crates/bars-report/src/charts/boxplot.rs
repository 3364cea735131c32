//! Box-plot statistics per domain and timepoint.

use bars_model::{ClinicalDomain, ScoredRecord, Timepoint};

use super::histogram::present_values;

/// Whisker reach as a multiple of the interquartile range.
const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

impl BoxStats {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Lowest and highest point drawn, outliers included.
    pub fn extent(&self) -> (f64, f64) {
        self.outliers.iter().fold(
            (self.lower_whisker, self.upper_whisker),
            |(low, high), value| (low.min(*value), high.max(*value)),
        )
    }
}

/// Quantile of sorted values by linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Statistics for one series; `None` when it is empty.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let reach = WHISKER_IQR * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let inside = || {
        sorted
            .iter()
            .copied()
            .filter(move |v| *v >= low_fence && *v <= high_fence)
    };
    let lower_whisker = inside().reduce(f64::min).unwrap_or(q1);
    let upper_whisker = inside().reduce(f64::max).unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
        count: sorted.len(),
    })
}

/// Baseline and follow-up boxes for one domain, in timepoint order.
pub fn domain_boxes(rows: &[ScoredRecord], domain: ClinicalDomain) -> [(Timepoint, Option<BoxStats>); 2] {
    Timepoint::ALL.map(|timepoint| (timepoint, box_stats(&present_values(rows, domain, timepoint))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quartiles_interpolate() {
        let stats = box_stats(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
        assert!(stats.outliers.is_empty());
        assert_eq!((stats.lower_whisker, stats.upper_whisker), (1.0, 4.0));
    }

    #[test]
    fn far_values_are_outliers() {
        let stats = box_stats(&[1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 40.0]).unwrap();
        assert_eq!(stats.outliers, vec![40.0]);
        assert_eq!(stats.upper_whisker, 4.0);
        assert_eq!(stats.extent(), (1.0, 40.0));
    }

    #[test]
    fn single_value_box() {
        let stats = box_stats(&[7.0]).unwrap();
        assert_eq!((stats.q1, stats.median, stats.q3), (7.0, 7.0, 7.0));
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn empty_series_has_no_box() {
        assert!(box_stats(&[]).is_none());
    }
}
