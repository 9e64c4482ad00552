//! Indicator output series.
//!
//! An indicator output has one slot per input time step. Slots that cannot be
//! computed yet because the lookback window is not full are `None`. Older
//! consumers expect the literal `-1` marker instead; [`to_sentinel`] produces
//! that encoding.

/// Indicator output: one optional value per input position.
pub type Series = Vec<Option<f64>>;

/// Legacy marker for "not yet computable" positions.
pub const SENTINEL: f64 = -1.0;

/// An all-undefined series of the given length.
pub fn undefined(len: usize) -> Series {
    vec![None; len]
}

/// Encode a series with the legacy `-1` sentinel.
pub fn to_sentinel(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().map(|v| v.unwrap_or(SENTINEL)).collect()
}

/// Iterate over the defined positions of a series as `(index, value)` pairs.
pub fn defined_points(series: &[Option<f64>]) -> impl Iterator<Item = (usize, f64)> + '_ {
    series
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|value| (i, value)))
}
