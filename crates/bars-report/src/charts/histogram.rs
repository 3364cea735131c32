//! Baseline and follow-up value distributions on shared bins.

use bars_model::{ClinicalDomain, ScoredRecord, Timepoint};

pub const DEFAULT_BINS: usize = 10;

/// Counts per bin for both timepoints of one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub domain: ClinicalDomain,
    /// `bins + 1` ascending edges; empty when the domain has no values.
    pub edges: Vec<f64>,
    pub baseline: Vec<usize>,
    pub follow_up: Vec<usize>,
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn max_count(&self) -> usize {
        self.baseline
            .iter()
            .chain(&self.follow_up)
            .copied()
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Present values of one domain at one timepoint, in row order.
pub fn present_values(rows: &[ScoredRecord], domain: ClinicalDomain, timepoint: Timepoint) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.record.measurement(domain, timepoint).value())
        .collect()
}

/// Equal-width edges from the minimum to the maximum of `values`.
///
/// A degenerate range `min == max` is widened to `[v - 0.5, v + 0.5]`.
pub fn bin_edges(values: &[f64], bins: usize) -> Option<Vec<f64>> {
    let bins = bins.max(1);
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    let (low, high) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (high - low) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|idx| low + width * idx as f64).collect();
    edges.push(high);
    Some(edges)
}

/// Bin index for a value. The last bin is closed on the right.
fn bin_index(value: f64, edges: &[f64]) -> Option<usize> {
    let bins = edges.len().checked_sub(1)?;
    let (low, high) = (*edges.first()?, *edges.last()?);
    if bins == 0 || value < low || value > high {
        return None;
    }
    let width = (high - low) / bins as f64;
    let idx = ((value - low) / width).floor() as usize;
    Some(idx.min(bins - 1))
}

pub fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    let mut counts = vec![0; edges.len().saturating_sub(1)];
    for value in values {
        if let Some(idx) = bin_index(*value, edges) {
            counts[idx] += 1;
        }
    }
    counts
}

/// Histogram of a domain's baseline and follow-up values over common edges.
pub fn histogram(rows: &[ScoredRecord], domain: ClinicalDomain, bins: usize) -> Histogram {
    let baseline = present_values(rows, domain, Timepoint::Baseline);
    let follow_up = present_values(rows, domain, Timepoint::FollowUp);
    let combined: Vec<f64> = baseline.iter().chain(&follow_up).copied().collect();
    let edges = bin_edges(&combined, bins).unwrap_or_default();
    Histogram {
        domain,
        baseline: bin_counts(&baseline, &edges),
        follow_up: bin_counts(&follow_up, &edges),
        edges,
    }
}
