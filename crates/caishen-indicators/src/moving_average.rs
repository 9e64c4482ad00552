//! Moving average indicators.

use caishen_core::error::{IndicatorError, IndicatorResult};
use caishen_core::traits::Indicator;
use caishen_core::types::{undefined, Series};

use crate::simd::{mean_simd, sum_simd};

/// Reject a zero-length window.
pub(crate) fn validate_lookback(name: &str, lookback: usize) -> IndicatorResult<()> {
    if lookback == 0 {
        return Err(IndicatorError::InvalidInput(format!(
            "The {} value has to be a positive integer, but it is set to 0",
            name
        )));
    }
    Ok(())
}

/// Apply `f` to every full trailing window of `data`.
///
/// The first `lookback - 1` slots are `None`; when `lookback` exceeds the
/// input length every slot is `None`.
pub(crate) fn rolling<F>(data: &[f64], lookback: usize, f: F) -> Series
where
    F: Fn(&[f64]) -> f64,
{
    if data.len() < lookback {
        return undefined(data.len());
    }

    let mut result = undefined(lookback - 1);
    result.reserve(data.len() - lookback + 1);
    result.extend(data.windows(lookback).map(|window| Some(f(window))));
    result
}

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    lookback: usize,
}

impl Sma {
    /// Default lookback.
    pub const DEFAULT_LOOKBACK: usize = 14;

    /// Create a new SMA with the specified lookback.
    pub fn new(lookback: usize) -> IndicatorResult<Self> {
        validate_lookback("lookback", lookback)?;
        Ok(Self { lookback })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> IndicatorResult<Series> {
        self.validate_data(data)?;
        Ok(rolling(data, self.lookback, mean_simd))
    }

    fn warmup(&self) -> usize {
        self.lookback - 1
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the simple average of the first `lookback` values, then
/// `ema[t] = value[t] * m + ema[t-1] * (1 - m)` with
/// `m = smoothing / (1 + lookback)`.
#[derive(Debug, Clone)]
pub struct Ema {
    lookback: usize,
    smoothing: f64,
}

impl Ema {
    /// Default lookback.
    pub const DEFAULT_LOOKBACK: usize = 12;
    /// Default smoothing factor.
    pub const DEFAULT_SMOOTHING: f64 = 2.0;

    /// Create a new EMA with the default smoothing factor.
    pub fn new(lookback: usize) -> IndicatorResult<Self> {
        Self::with_smoothing(lookback, Self::DEFAULT_SMOOTHING)
    }

    /// Create an EMA with a custom smoothing factor.
    pub fn with_smoothing(lookback: usize, smoothing: f64) -> IndicatorResult<Self> {
        validate_lookback("lookback", lookback)?;
        if !smoothing.is_finite() || smoothing < 0.0 {
            return Err(IndicatorError::InvalidInput(format!(
                "The smoothing value has to be a non negative float, but it is set to {}",
                smoothing
            )));
        }
        Ok(Self {
            lookback,
            smoothing,
        })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Weight applied to the newest value.
    pub fn multiplier(&self) -> f64 {
        self.smoothing / (1.0 + self.lookback as f64)
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> IndicatorResult<Series> {
        self.validate_data(data)?;

        // Without a full seed window the recursion has nothing to consume.
        if data.len() < self.lookback {
            return Ok(undefined(data.len()));
        }

        let multiplier = self.multiplier();
        let one_minus_mult = 1.0 - multiplier;

        let mut result = undefined(self.lookback - 1);
        result.reserve(data.len() - self.lookback + 1);

        let mut ema = sum_simd(&data[..self.lookback]) / self.lookback as f64;
        result.push(Some(ema));

        for &price in &data[self.lookback..] {
            ema = price * multiplier + ema * one_minus_mult;
            result.push(Some(ema));
        }

        Ok(result)
    }

    fn warmup(&self) -> usize {
        self.lookback - 1
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Simple moving average of `values` over `lookback` positions.
pub fn sma(values: &[f64], lookback: usize) -> IndicatorResult<Series> {
    Sma::new(lookback)?.calculate(values)
}

/// Exponential moving average of `values`.
pub fn ema(values: &[f64], lookback: usize, smoothing: f64) -> IndicatorResult<Series> {
    Ema::with_smoothing(lookback, smoothing)?.calculate(values)
}
