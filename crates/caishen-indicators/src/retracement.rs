//! Fibonacci retracement levels.

use caishen_core::error::{IndicatorError, IndicatorResult};

/// Default retracement ratios.
pub const DEFAULT_FIBONACCI_LEVELS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.764];

/// Fibonacci retracement over a price move.
///
/// Each level is measured back from `end_price` towards `start_price`: a
/// rising move retraces downwards, a falling move upwards.
#[derive(Debug, Clone)]
pub struct FibonacciRetracement {
    levels: Vec<f64>,
}

impl FibonacciRetracement {
    /// Create a retracement with custom ratios, e.g. `0.236` for 23.6%.
    pub fn new(levels: Vec<f64>) -> IndicatorResult<Self> {
        if levels.is_empty() {
            return Err(IndicatorError::InvalidInput(
                "The list of fibonacci levels must not be empty".to_string(),
            ));
        }
        if let Some(level) = levels
            .iter()
            .find(|l| !l.is_finite() || !(0.0..=1.0).contains(*l))
        {
            return Err(IndicatorError::InvalidInput(format!(
                "Fibonacci levels have to be within [0, 1], but one is set to {}",
                level
            )));
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Price of every level, in the order the levels were given.
    pub fn calculate(&self, start_price: f64, end_price: f64) -> IndicatorResult<Vec<f64>> {
        for (label, price) in [("start", start_price), ("end", end_price)] {
            if !price.is_finite() {
                return Err(IndicatorError::InvalidInput(format!(
                    "The {} price is expected to be a finite float but it is {}",
                    label, price
                )));
            }
        }

        let difference = (end_price - start_price).abs();
        let direction = if end_price > start_price { -1.0 } else { 1.0 };

        Ok(self
            .levels
            .iter()
            .map(|level| end_price + direction * difference * level)
            .collect())
    }
}

impl Default for FibonacciRetracement {
    fn default() -> Self {
        Self {
            levels: DEFAULT_FIBONACCI_LEVELS.to_vec(),
        }
    }
}

/// Fibonacci retracement prices between `start_price` and `end_price`.
pub fn fibonacci_retracements(
    start_price: f64,
    end_price: f64,
    levels: &[f64],
) -> IndicatorResult<Vec<f64>> {
    FibonacciRetracement::new(levels.to_vec())?.calculate(start_price, end_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round2(values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| (v * 100.0).round() / 100.0).collect()
    }

    #[test]
    fn test_rising_price() {
        let levels = fibonacci_retracements(10.0, 20.0, &[0.236, 0.786]).unwrap();
        assert_eq!(round2(&levels), vec![17.64, 12.14]);
    }

    #[test]
    fn test_falling_price() {
        let levels = fibonacci_retracements(20.0, 10.0, &[0.236, 0.786]).unwrap();
        assert_eq!(round2(&levels), vec![12.36, 17.86]);
    }

    #[test]
    fn test_flat_move() {
        let levels = fibonacci_retracements(15.0, 15.0, &[0.236, 0.5]).unwrap();
        assert_eq!(levels, vec![15.0, 15.0]);
    }

    #[test]
    fn test_default_levels() {
        let fib = FibonacciRetracement::default();
        let levels = fib.calculate(100.0, 200.0).unwrap();

        assert_eq!(levels.len(), DEFAULT_FIBONACCI_LEVELS.len());
        assert!((levels[2] - 150.0).abs() < 1e-10);
        // Rising move: deeper ratios sit lower
        assert!(levels.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            fibonacci_retracements(f64::NAN, 20.0, &[0.5]),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(matches!(
            fibonacci_retracements(10.0, f64::INFINITY, &[0.5]),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(fibonacci_retracements(10.0, 20.0, &[]).is_err());
        assert!(fibonacci_retracements(10.0, 20.0, &[1.5]).is_err());
    }
}
