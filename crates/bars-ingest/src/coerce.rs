//! Text to measurement coercion.

use bars_model::Measurement;

/// Parses a cell as a measurement.
///
/// Empty, non-numeric and non-finite cells become [`Measurement::Missing`].
/// A decimal comma is not accepted.
pub fn coerce_measurement(text: &str) -> Measurement {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Measurement::Missing;
    }
    trimmed
        .parse::<f64>()
        .map_or(Measurement::Missing, Measurement::new)
}
