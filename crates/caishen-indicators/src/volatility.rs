//! Volatility indicators.

use caishen_core::error::{IndicatorError, IndicatorResult};
use caishen_core::traits::MultiOutputIndicator;
use caishen_core::types::Series;
use serde::{Deserialize, Serialize};

use crate::moving_average::{rolling, validate_lookback};
use crate::simd::{mean_simd, variance_simd};

/// Bollinger Bands output.
///
/// All three bands share the input length and the same warm-up slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Lower band (mean - k * stdev)
    pub lower: Series,
    /// Middle band (SMA)
    pub middle: Series,
    /// Upper band (mean + k * stdev)
    pub upper: Series,
}

/// Bollinger Bands.
///
/// A middle band (SMA) with upper and lower bands at a multiple of the
/// population standard deviation of the same window.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    lookback: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Default lookback.
    pub const DEFAULT_LOOKBACK: usize = 20;
    /// Default band width in standard deviations.
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Create Bollinger Bands two standard deviations wide.
    pub fn new(lookback: usize) -> IndicatorResult<Self> {
        Self::with_params(lookback, Self::DEFAULT_MULTIPLIER)
    }

    /// Create Bollinger Bands with a custom band width.
    pub fn with_params(lookback: usize, std_dev_multiplier: f64) -> IndicatorResult<Self> {
        validate_lookback("lookback", lookback)?;
        if !std_dev_multiplier.is_finite() || std_dev_multiplier < 0.0 {
            return Err(IndicatorError::InvalidInput(format!(
                "The standard deviation multiplier has to be a non negative float, but it is set to {}",
                std_dev_multiplier
            )));
        }
        Ok(Self {
            lookback,
            std_dev_multiplier,
        })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }
}

impl MultiOutputIndicator for BollingerBands {
    type Outputs = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> IndicatorResult<BollingerOutput> {
        self.validate_data(data)?;

        // (mean, population stdev) per window
        let bands: Vec<Option<(f64, f64)>> = rolling(data, self.lookback, mean_simd)
            .into_iter()
            .enumerate()
            .map(|(i, mean)| {
                mean.map(|mean| {
                    let window = &data[i + 1 - self.lookback..=i];
                    (mean, variance_simd(window, mean).sqrt())
                })
            })
            .collect();

        let k = self.std_dev_multiplier;
        Ok(BollingerOutput {
            lower: bands.iter().map(|b| b.map(|(m, sd)| m - k * sd)).collect(),
            middle: bands.iter().map(|b| b.map(|(m, _)| m)).collect(),
            upper: bands.iter().map(|b| b.map(|(m, sd)| m + k * sd)).collect(),
        })
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

/// Bollinger Bands of `values`, returned as `(lower, middle, upper)`.
pub fn bollinger_bands(values: &[f64], lookback: usize) -> IndicatorResult<(Series, Series, Series)> {
    let output = BollingerBands::new(lookback)?.calculate(values)?;
    Ok((output.lower, output.middle, output.upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_series_close(actual: &[Option<f64>], expected: &[Option<f64>]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            match (a, e) {
                (Some(a), Some(e)) => assert!((a - e).abs() < 1e-10, "{} != {}", a, e),
                (None, None) => {}
                _ => panic!("{:?} != {:?}", actual, expected),
            }
        }
    }

    #[test]
    fn test_bollinger_bands() {
        let (lower, middle, upper) = bollinger_bands(&[1.0, 2.0, 3.0, 4.0, 5.0], 2).unwrap();

        assert_series_close(&lower, &[None, Some(0.5), Some(1.5), Some(2.5), Some(3.5)]);
        assert_series_close(&middle, &[None, Some(1.5), Some(2.5), Some(3.5), Some(4.5)]);
        assert_series_close(&upper, &[None, Some(2.5), Some(3.5), Some(4.5), Some(5.5)]);
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let bb = BollingerBands::new(20).unwrap();
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.1).sin() * 5.0)
            .collect();

        let output = bb.calculate(&data).unwrap();
        assert_eq!(output.middle.len(), data.len());
        assert!(output.middle[..19].iter().all(Option::is_none));

        for i in 19..data.len() {
            let (lower, middle, upper) = (
                output.lower[i].unwrap(),
                output.middle[i].unwrap(),
                output.upper[i].unwrap(),
            );
            assert!(upper > middle);
            assert!(middle > lower);
            // Bands are symmetric around the mean
            assert!(((upper - middle) - (middle - lower)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bollinger_constant_price_collapses() {
        let (lower, middle, upper) = bollinger_bands(&[100.0; 5], 5).unwrap();

        // lookback == len leaves exactly one defined slot, at the end
        assert_eq!(middle.iter().filter(|v| v.is_some()).count(), 1);
        assert_eq!(lower[4], Some(100.0));
        assert_eq!(middle[4], Some(100.0));
        assert_eq!(upper[4], Some(100.0));
    }

    #[test]
    fn test_bollinger_lookback_exceeds_length() {
        let (lower, middle, upper) = bollinger_bands(&[1.0, 2.0], 5).unwrap();
        assert_eq!(lower, vec![None, None]);
        assert_eq!(middle, vec![None, None]);
        assert_eq!(upper, vec![None, None]);
    }

    #[test]
    fn test_bollinger_errors() {
        assert!(matches!(
            bollinger_bands(&[], 2),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(matches!(
            bollinger_bands(&[1.0, 2.0, 3.0, 7.0, 5.0], 0),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(BollingerBands::with_params(20, -1.0).is_err());
    }
}
