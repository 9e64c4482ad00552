//! Indicator trait definitions.

use crate::error::{IndicatorError, IndicatorResult};
use crate::types::Series;

/// Trait for single-line technical indicators.
///
/// Implementations validate their parameters on construction and their input
/// before computing anything. The returned series has one slot per input
/// value; warm-up slots are `None`.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    ///
    /// # Arguments
    /// * `data` - Input data (typically closing prices)
    fn calculate(&self, data: &[f64]) -> IndicatorResult<Series>;

    /// Number of leading input positions without a value.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Reject an empty input sequence.
    fn validate_data(&self, data: &[f64]) -> IndicatorResult<()> {
        if data.is_empty() {
            return Err(IndicatorError::empty_values());
        }
        Ok(())
    }
}

/// Multi-output indicator (e.g., Bollinger Bands, MACD).
///
/// Some indicators produce several index-aligned lines.
pub trait MultiOutputIndicator: Send + Sync {
    /// The output type containing multiple series.
    type Outputs;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> IndicatorResult<Self::Outputs>;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Reject an empty input sequence.
    fn validate_data(&self, data: &[f64]) -> IndicatorResult<()> {
        if data.is_empty() {
            return Err(IndicatorError::empty_values());
        }
        Ok(())
    }
}

/// Indicator over parallel high / low / close series.
pub trait HlcIndicator: Send + Sync {
    /// The output type of the indicator.
    type Outputs;

    /// Calculate indicator values from aligned high, low and close prices.
    fn calculate_hlc(&self, high: &[f64], low: &[f64], close: &[f64])
        -> IndicatorResult<Self::Outputs>;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Require non-empty series of equal length.
    fn validate_hlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> IndicatorResult<()> {
        if high.len() != low.len() || high.len() != close.len() {
            return Err(IndicatorError::InvalidInput(format!(
                "The length of values are mismatching: high={}, low={}, close={}",
                high.len(),
                low.len(),
                close.len()
            )));
        }
        if close.is_empty() {
            return Err(IndicatorError::empty_values());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WindowSum {
        period: usize,
    }

    impl Indicator for WindowSum {
        fn calculate(&self, data: &[f64]) -> IndicatorResult<Series> {
            self.validate_data(data)?;
            let mut out = vec![None; data.len().min(self.warmup())];
            out.extend(data.windows(self.period).map(|w| Some(w.iter().sum())));
            Ok(out)
        }

        fn warmup(&self) -> usize {
            self.period - 1
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    struct Range;

    impl HlcIndicator for Range {
        type Outputs = Vec<f64>;

        fn calculate_hlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> IndicatorResult<Vec<f64>> {
            self.validate_hlc(high, low, close)?;
            Ok(high.iter().zip(low).map(|(h, l)| h - l).collect())
        }

        fn name(&self) -> &str {
            "range"
        }
    }

    #[test]
    fn test_indicator_validation() {
        let indicator = WindowSum { period: 3 };

        assert!(indicator.validate_data(&[]).is_err());
        assert!(indicator.validate_data(&[1.0]).is_ok());
    }

    #[test]
    fn test_indicator_calculate() {
        let indicator = WindowSum { period: 3 };
        let result = indicator.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        assert_eq!(result, vec![None, None, Some(6.0), Some(9.0), Some(12.0)]);
    }

    #[test]
    fn test_hlc_length_mismatch() {
        let err = Range
            .calculate_hlc(&[2.0, 3.0], &[1.0], &[1.5, 2.5])
            .unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidInput(_)));

        let ok = Range.calculate_hlc(&[2.0, 3.0], &[1.0, 1.0], &[1.5, 2.5]).unwrap();
        assert_eq!(ok, vec![1.0, 2.0]);
    }
}
