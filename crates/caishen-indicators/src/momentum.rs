//! Momentum indicators.

use caishen_core::error::IndicatorResult;
use caishen_core::traits::{HlcIndicator, Indicator, MultiOutputIndicator};
use caishen_core::types::{undefined, Series};
use serde::{Deserialize, Serialize};

use crate::moving_average::{validate_lookback, Ema, Sma};
use crate::simd::minmax_simd;

/// %K reported when the high / low window has zero range.
pub const FLAT_RANGE_K: f64 = 50.0;

/// RSI reported when the average loss is zero.
pub const NO_LOSS_RSI: f64 = 100.0;

fn round_dp(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Relative Strength Index (RSI).
///
/// Average gains and losses are simple moving averages of the per-step
/// changes; the first step counts as neither. Values are rounded to four
/// decimals.
#[derive(Debug, Clone)]
pub struct Rsi {
    lookback: usize,
}

impl Rsi {
    /// Default lookback.
    pub const DEFAULT_LOOKBACK: usize = 14;

    /// Create a new RSI indicator.
    pub fn new(lookback: usize) -> IndicatorResult<Self> {
        validate_lookback("lookback", lookback)?;
        Ok(Self { lookback })
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> IndicatorResult<Series> {
        self.validate_data(data)?;

        let mut gains = Vec::with_capacity(data.len());
        let mut losses = Vec::with_capacity(data.len());
        gains.push(0.0);
        losses.push(0.0);

        for pair in data.windows(2) {
            let change = pair[1] - pair[0];
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        let sma = Sma::new(self.lookback)?;
        let average_gain = sma.calculate(&gains)?;
        let average_loss = sma.calculate(&losses)?;

        Ok(average_gain
            .iter()
            .zip(&average_loss)
            .map(|(gain, loss)| match (gain, loss) {
                (Some(_), Some(loss)) if *loss == 0.0 => Some(NO_LOSS_RSI),
                (Some(gain), Some(loss)) => {
                    Some(round_dp(100.0 - 100.0 / (1.0 + gain / loss), 4))
                }
                _ => None,
            })
            .collect())
    }

    fn warmup(&self) -> usize {
        self.lookback - 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Series,
    /// Signal line (EMA of MACD)
    pub signal: Series,
}

impl MacdOutput {
    /// MACD minus signal, where both are defined.
    pub fn histogram(&self) -> Series {
        self.macd
            .iter()
            .zip(&self.signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect()
    }
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Default (fast, slow) lookbacks.
    pub const DEFAULT_LOOKBACK: (usize, usize) = (12, 26);
    /// Default signal lookback.
    pub const DEFAULT_SIGNAL_LOOKBACK: usize = 9;

    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> IndicatorResult<Self> {
        Self::with_lookbacks(Self::DEFAULT_LOOKBACK, Self::DEFAULT_SIGNAL_LOOKBACK)
    }

    /// Create a MACD with custom lookbacks and the default smoothing.
    pub fn with_lookbacks(lookback: (usize, usize), signal_lookback: usize) -> IndicatorResult<Self> {
        Self::with_params(
            lookback,
            (Ema::DEFAULT_SMOOTHING, Ema::DEFAULT_SMOOTHING),
            signal_lookback,
            Ema::DEFAULT_SMOOTHING,
        )
    }

    /// Create a MACD with full control over lookbacks and smoothing factors.
    pub fn with_params(
        lookback: (usize, usize),
        smoothing: (f64, f64),
        signal_lookback: usize,
        signal_smoothing: f64,
    ) -> IndicatorResult<Self> {
        validate_lookback("signal lookback", signal_lookback)?;
        Ok(Self {
            fast: Ema::with_smoothing(lookback.0, smoothing.0)?,
            slow: Ema::with_smoothing(lookback.1, smoothing.1)?,
            signal: Ema::with_smoothing(signal_lookback, signal_smoothing)?,
        })
    }

    /// First index at which the MACD line is defined.
    pub fn macd_warmup(&self) -> usize {
        self.fast.warmup().max(self.slow.warmup())
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdOutput;

    fn calculate(&self, data: &[f64]) -> IndicatorResult<MacdOutput> {
        self.validate_data(data)?;

        let fast = self.fast.calculate(data)?;
        let slow = self.slow.calculate(data)?;

        let macd: Series = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        // The signal EMA runs over the defined tail of the MACD line only.
        let warmup = self.macd_warmup();
        let mut signal = undefined(warmup.min(data.len()));
        if data.len() > warmup {
            let tail: Vec<f64> = macd[warmup..].iter().flatten().copied().collect();
            signal.extend(self.signal.calculate(&tail)?);
        }

        Ok(MacdOutput { macd, signal })
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Stochastic oscillator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (fast stochastic)
    pub k: Series,
    /// %D (SMA of %K)
    pub d: Series,
}

impl StochasticOutput {
    /// The most recent `(%K, %D)` scores.
    pub fn latest(&self) -> (Option<f64>, Option<f64>) {
        (
            self.k.last().copied().flatten(),
            self.d.last().copied().flatten(),
        )
    }
}

/// Stochastic oscillator.
///
/// Compares the closing price to the high / low range of a trailing window.
/// A window with zero range yields [`FLAT_RANGE_K`].
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_lookback: usize,
    d: Sma,
}

impl Stochastic {
    /// Default %K lookback.
    pub const DEFAULT_K_LOOKBACK: usize = 5;
    /// Default %D lookback.
    pub const DEFAULT_D_LOOKBACK: usize = 3;

    /// Create a new stochastic oscillator with default parameters (5, 3).
    pub fn new() -> IndicatorResult<Self> {
        Self::with_lookbacks(Self::DEFAULT_K_LOOKBACK, Self::DEFAULT_D_LOOKBACK)
    }

    /// Create with custom lookbacks.
    pub fn with_lookbacks(k_lookback: usize, d_lookback: usize) -> IndicatorResult<Self> {
        validate_lookback("K lookback", k_lookback)?;
        validate_lookback("D lookback", d_lookback)?;
        Ok(Self {
            k_lookback,
            d: Sma::new(d_lookback)?,
        })
    }
}

impl HlcIndicator for Stochastic {
    type Outputs = StochasticOutput;

    fn calculate_hlc(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> IndicatorResult<StochasticOutput> {
        self.validate_hlc(high, low, close)?;

        let len = close.len();
        let warmup = (self.k_lookback - 1).min(len);

        let raw_k: Vec<f64> = ((self.k_lookback - 1)..len)
            .map(|i| {
                let start = i + 1 - self.k_lookback;
                let highest = minmax_simd(&high[start..=i]).map_or(f64::NAN, |(_, max)| max);
                let lowest = minmax_simd(&low[start..=i]).map_or(f64::NAN, |(min, _)| min);

                let range = highest - lowest;
                if range == 0.0 {
                    FLAT_RANGE_K
                } else {
                    100.0 * (close[i] - lowest) / range
                }
            })
            .collect();

        let mut k = undefined(warmup);
        k.extend(raw_k.iter().copied().map(Some));

        let mut d = undefined(warmup);
        if !raw_k.is_empty() {
            d.extend(self.d.calculate(&raw_k)?);
        }

        Ok(StochasticOutput { k, d })
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

/// Relative strength index of closing prices.
pub fn rsi(values: &[f64], lookback: usize) -> IndicatorResult<Series> {
    Rsi::new(lookback)?.calculate(values)
}

/// MACD and signal lines of `values`.
pub fn macd(
    values: &[f64],
    lookback: (usize, usize),
    smoothing: (f64, f64),
    signal_lookback: usize,
    signal_smoothing: f64,
) -> IndicatorResult<MacdOutput> {
    Macd::with_params(lookback, smoothing, signal_lookback, signal_smoothing)?.calculate(values)
}

/// Stochastic oscillator over aligned high / low / close prices.
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_lookback: usize,
    d_lookback: usize,
) -> IndicatorResult<StochasticOutput> {
    Stochastic::with_lookbacks(k_lookback, d_lookback)?.calculate_hlc(high, low, close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caishen_core::error::IndicatorError;

    fn rounded(series: &[Option<f64>]) -> Vec<Option<f64>> {
        series.iter().map(|v| v.map(|x| round_dp(x, 4))).collect()
    }

    fn hlc_fixture() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            vec![100.0, 101.0, 104.0, 105.0, 100.0, 110.0, 108.0, 97.0],
            vec![99.0, 100.0, 99.0, 102.0, 98.0, 105.0, 95.0, 94.0],
            vec![100.5, 100.5, 103.0, 104.0, 99.0, 106.0, 95.0, 96.0],
        )
    }

    #[test]
    fn test_rsi_known_values() {
        let result = rsi(&[1.0, 1.2, 1.4, 1.1, 0.9], 3).unwrap();
        assert_eq!(
            result,
            vec![None, None, Some(NO_LOSS_RSI), Some(57.1429), Some(28.5714)]
        );
    }

    #[test]
    fn test_rsi_bounds() {
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi(&data, 14).unwrap();
        assert_eq!(result.len(), data.len());
        assert!(result[..13].iter().all(Option::is_none));

        for value in result.iter().flatten() {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains_and_losses() {
        let up = rsi(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], 5).unwrap();
        assert_eq!(up.last().copied().flatten(), Some(100.0));

        let down = rsi(&[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0], 5).unwrap();
        assert_eq!(down.last().copied().flatten(), Some(0.0));
    }

    #[test]
    fn test_rsi_flat_series_reads_as_no_loss() {
        let result = rsi(&[5.0; 6], 3).unwrap();
        let mut expected = vec![None, None];
        expected.extend([Some(NO_LOSS_RSI); 4]);
        assert_eq!(result, expected);
        assert_eq!(NO_LOSS_RSI, 100.0);
    }

    #[test]
    fn test_rsi_single_value() {
        assert_eq!(rsi(&[42.0], 1).unwrap(), vec![Some(NO_LOSS_RSI)]);
        assert!(matches!(rsi(&[], 3), Err(IndicatorError::InvalidInput(_))));
        assert!(matches!(rsi(&[1.0, 2.0], 0), Err(IndicatorError::InvalidInput(_))));
    }

    #[test]
    fn test_macd_known_values() {
        let values = vec![
            10.40, 10.50, 10.10, 10.48, 10.51, 10.80, 10.80, 10.71, 10.79, 11.21, 11.42, 11.84,
        ];
        let output = macd(&values, (3, 6), (2.0, 2.0), 3, 2.0).unwrap();

        let mut expected_macd = vec![None; 5];
        expected_macd.extend(
            [0.1642, 0.1539, 0.1089, 0.0945, 0.1658, 0.2126, 0.2889].map(Some),
        );
        let mut expected_signal = vec![None; 7];
        expected_signal.extend([0.1423, 0.1184, 0.1421, 0.1773, 0.2331].map(Some));

        assert_eq!(rounded(&output.macd), expected_macd);
        assert_eq!(rounded(&output.signal), expected_signal);
    }

    #[test]
    fn test_macd_fast_slower_than_slow() {
        let values = vec![
            10.40, 10.50, 10.10, 10.48, 10.51, 10.80, 10.80, 10.71, 10.79, 11.21, 11.42, 11.84,
        ];
        let normal = macd(&values, (3, 6), (2.0, 2.0), 3, 2.0).unwrap();
        let swapped = macd(&values, (6, 3), (2.0, 2.0), 3, 2.0).unwrap();

        // Line starts at max(fast, slow) - 1 and is the negated normal line
        assert!(swapped.macd[..5].iter().all(Option::is_none));
        for (s, n) in swapped.macd.iter().zip(&normal.macd).skip(5) {
            assert!((s.unwrap() + n.unwrap()).abs() < 1e-12);
        }
        assert!(swapped.signal[..7].iter().all(Option::is_none));
        assert!(swapped.signal[7].is_some());
        assert_eq!(swapped.signal.len(), values.len());
    }

    #[test]
    fn test_macd_uptrend() {
        let indicator = Macd::new().unwrap();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let output = indicator.calculate(&data).unwrap();

        assert_eq!(output.macd.len(), data.len());
        assert_eq!(output.signal.len(), data.len());
        assert!(output.macd[24].is_none());
        assert!(output.macd[25].is_some());
        assert!(output.signal[32].is_none());
        assert!(output.signal[33].is_some());

        // In an uptrend the fast EMA leads the slow one
        assert!(output.macd.last().unwrap().unwrap() > 0.0);
        assert_eq!(output.histogram().iter().flatten().count(), data.len() - 33);
    }

    #[test]
    fn test_macd_short_input_is_undefined() {
        let output = macd(&[1.0, 2.0, 3.0], (12, 26), (2.0, 2.0), 9, 2.0).unwrap();
        assert_eq!(output.macd, vec![None, None, None]);
        assert_eq!(output.signal, vec![None, None, None]);

        // MACD defined, but not enough of it for a signal seed
        let data: Vec<f64> = (0..7).map(|i| i as f64).collect();
        let output = macd(&data, (3, 6), (2.0, 2.0), 3, 2.0).unwrap();
        assert_eq!(output.macd.iter().flatten().count(), 2);
        assert!(output.signal.iter().all(Option::is_none));
        assert_eq!(output.signal.len(), 7);
    }

    #[test]
    fn test_macd_errors() {
        assert!(matches!(
            macd(&[], (12, 26), (2.0, 2.0), 9, 2.0),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(Macd::with_lookbacks((12, 26), 0).is_err());
        assert!(Macd::with_params((12, 26), (2.0, -1.0), 9, 2.0).is_err());
    }

    #[test]
    fn test_stochastic_known_values() {
        let (high, low, close) = hlc_fixture();
        let output = stochastic(&high, &low, &close, 5, 3).unwrap();

        let mut expected_k = vec![None; 4];
        expected_k.extend([14.2857, 66.6667, 0.0, 12.5].map(Some));
        let mut expected_d = vec![None; 6];
        expected_d.extend([26.9841, 26.3889].map(Some));

        assert_eq!(rounded(&output.k), expected_k);
        assert_eq!(rounded(&output.d), expected_d);

        let (k, d) = output.latest();
        assert_eq!(k.map(|v| round_dp(v, 4)), Some(12.5));
        assert_eq!(d.map(|v| round_dp(v, 4)), Some(26.3889));
    }

    #[test]
    fn test_stochastic_at_high() {
        let high = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0];
        let low = vec![5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        let close = high.clone();

        let output = stochastic(&high, &low, &close, 5, 3).unwrap();
        assert_eq!(output.latest(), (Some(100.0), Some(100.0)));
    }

    #[test]
    fn test_stochastic_flat_window() {
        let flat = vec![50.0; 6];
        let output = stochastic(&flat, &flat, &flat, 3, 2).unwrap();

        assert!(output.k.iter().flatten().all(|k| *k == FLAT_RANGE_K));
        assert_eq!(output.k.iter().flatten().count(), 4);
    }

    #[test]
    fn test_stochastic_short_input() {
        let output = stochastic(&[2.0, 3.0], &[1.0, 2.0], &[1.5, 2.5], 5, 3).unwrap();
        assert_eq!(output.k, vec![None, None]);
        assert_eq!(output.d, vec![None, None]);
        assert_eq!(output.latest(), (None, None));
    }

    #[test]
    fn test_stochastic_errors() {
        let (high, low, close) = hlc_fixture();

        assert!(matches!(
            stochastic(&high, &low[..7], &close, 5, 3),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(matches!(
            stochastic(&[], &[], &[], 5, 3),
            Err(IndicatorError::InvalidInput(_))
        ));
        assert!(Stochastic::with_lookbacks(0, 3).is_err());
        assert!(Stochastic::with_lookbacks(5, 0).is_err());
    }
}
