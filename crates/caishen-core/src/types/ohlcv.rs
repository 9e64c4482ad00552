//! OHLCV (Open, High, Low, Close, Volume) price data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StockInterval;

/// A single OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bar where every price is the close, for close-only histories.
    pub fn from_close(timestamp: i64, close: f64) -> Self {
        Self::new(timestamp, close, close, close, close, 0.0)
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// An ordered price history for one symbol.
///
/// The column extractors (`highs`, `lows`, `closes`, ...) always return
/// index-aligned vectors of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Symbol identifier
    pub symbol: String,
    /// Sampling interval of the bars
    pub interval: StockInterval,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Create a new empty series.
    pub fn new(symbol: impl Into<String>, interval: StockInterval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            bars: Vec::new(),
        }
    }

    /// Create a series from bars, sorting them oldest first.
    pub fn from_bars(symbol: impl Into<String>, interval: StockInterval, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the first bar.
    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract open prices as a vector.
    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Extract timestamps (Unix milliseconds) as a vector.
    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Extract RFC 3339 dates as a vector, for chart axes.
    pub fn dates(&self) -> Vec<String> {
        self.bars.iter().map(|b| b.datetime().to_rfc3339()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_from_close() {
        let flat = Bar::from_close(1000, 42.0);
        assert_eq!((flat.open, flat.high, flat.low), (42.0, 42.0, 42.0));
        assert_eq!(flat.volume, 0.0);
    }

    #[test]
    fn test_bar_datetime() {
        let bar = Bar::new(1_705_276_800_000, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert_eq!(bar.datetime().to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_from_bars_sorts() {
        let series = PriceSeries::from_bars(
            "AAPL",
            StockInterval::OneDay,
            vec![
                Bar::new(3, 102.5, 104.0, 102.0, 103.5, 1000.0),
                Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0),
                Bar::new(2, 100.5, 102.0, 100.0, 101.5, 1000.0),
            ],
        );

        assert_eq!(series.timestamps(), vec![1, 2, 3]);
        assert_eq!(series.first().unwrap().close, 100.5);
        assert_eq!(series.last().unwrap().close, 103.5);
    }

    #[test]
    fn test_series_extractions() {
        let series = PriceSeries::from_bars(
            "AAPL",
            StockInterval::OneDay,
            vec![
                Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0),
                Bar::new(2, 100.5, 102.0, 100.0, 101.5, 2000.0),
            ],
        );

        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.highs(), vec![101.0, 102.0]);
        assert_eq!(series.lows(), vec![99.0, 100.0]);
        assert_eq!(series.volumes(), vec![1000.0, 2000.0]);
        assert_eq!(series.dates().len(), series.len());
    }
}
