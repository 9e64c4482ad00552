//! Vendor history payloads.
//!
//! The vendor answers a history request with one object per ticker:
//!
//! ```json
//! { "AAPL": { "timestamp": [1700000000, ...], "close": [189.7, ...],
//!             "open": [...], "high": [...], "low": [...], "volume": [...] } }
//! ```
//!
//! Timestamps are Unix seconds. Only `timestamp` and `close` are required.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use caishen_core::error::DataError;
use caishen_core::traits::PriceSource;
use caishen_core::types::{Bar, PriceSeries, StockInterval};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct TickerHistory {
    timestamp: Vec<i64>,
    close: Vec<Option<f64>>,
    #[serde(default)]
    open: Option<Vec<Option<f64>>>,
    #[serde(default)]
    high: Option<Vec<Option<f64>>>,
    #[serde(default)]
    low: Option<Vec<Option<f64>>>,
    #[serde(default)]
    volume: Option<Vec<Option<f64>>>,
}

impl TickerHistory {
    fn check_lengths(&self, ticker: &str) -> Result<(), DataError> {
        let expected = self.timestamp.len();
        let columns = [
            ("close", Some(&self.close)),
            ("open", self.open.as_ref()),
            ("high", self.high.as_ref()),
            ("low", self.low.as_ref()),
            ("volume", self.volume.as_ref()),
        ];

        for (name, column) in columns {
            if let Some(column) = column {
                if column.len() != expected {
                    return Err(DataError::Parse(format!(
                        "{}: the {} column has {} values but there are {} timestamps",
                        ticker,
                        name,
                        column.len(),
                        expected
                    )));
                }
            }
        }
        Ok(())
    }

    fn into_series(self, ticker: &str, interval: StockInterval) -> Result<PriceSeries, DataError> {
        self.check_lengths(ticker)?;

        let pick = |column: &Option<Vec<Option<f64>>>, i: usize| {
            column.as_ref().and_then(|values| values[i])
        };

        let mut skipped = 0usize;
        let mut bars = Vec::with_capacity(self.timestamp.len());
        for (i, &seconds) in self.timestamp.iter().enumerate() {
            // Vendor leaves gaps as nulls; a bar without a close is unusable
            let Some(close) = self.close[i] else {
                skipped += 1;
                continue;
            };
            let timestamp = seconds.checked_mul(1000).ok_or_else(|| {
                DataError::Parse(format!("{}: timestamp {} is out of range", ticker, seconds))
            })?;
            bars.push(Bar::new(
                timestamp,
                pick(&self.open, i).unwrap_or(close),
                pick(&self.high, i).unwrap_or(close),
                pick(&self.low, i).unwrap_or(close),
                close,
                pick(&self.volume, i).unwrap_or(0.0),
            ));
        }

        if skipped > 0 {
            warn!(ticker, skipped, "Dropped bars without a close price");
        }

        Ok(PriceSeries::from_bars(ticker, interval, bars))
    }
}

/// Parse a vendor history payload into one series per ticker, ordered by
/// ticker.
pub fn parse_history_response(
    payload: &str,
    interval: StockInterval,
) -> Result<Vec<PriceSeries>, DataError> {
    let tickers: BTreeMap<String, TickerHistory> =
        serde_json::from_str(payload).map_err(|e| DataError::Parse(e.to_string()))?;

    if tickers.is_empty() {
        return Err(DataError::Parse(
            "The history payload holds no tickers".to_string(),
        ));
    }

    tickers
        .into_iter()
        .map(|(ticker, history)| {
            debug!(ticker = %ticker, points = history.timestamp.len(), "Parsing ticker history");
            history.into_series(&ticker, interval)
        })
        .collect()
}

/// Price histories held in a saved vendor payload.
pub struct JsonPriceSource {
    series: BTreeMap<String, PriceSeries>,
}

impl JsonPriceSource {
    /// Parse a payload that is already in memory.
    pub fn from_payload(payload: &str, interval: StockInterval) -> Result<Self, DataError> {
        let series = parse_history_response(payload, interval)?
            .into_iter()
            .map(|s| (s.symbol.to_uppercase(), s))
            .collect();
        Ok(Self { series })
    }

    /// Read and parse a payload saved at `path`.
    pub async fn open(path: impl AsRef<Path>, interval: StockInterval) -> Result<Self, DataError> {
        let path = path.as_ref();
        let payload = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| DataError::NotFound(path.display().to_string()))?;

        let source = Self::from_payload(&payload, interval)?;
        info!(
            path = %path.display(),
            tickers = source.series.len(),
            "Loaded vendor history payload"
        );
        Ok(source)
    }
}

#[async_trait]
impl PriceSource for JsonPriceSource {
    async fn load_history(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        self.series
            .get(&symbol.to_uppercase())
            .filter(|series| !series.is_empty())
            .cloned()
            .ok_or_else(|| DataError::NoDataAvailable(symbol.to_string()))
    }

    fn symbols(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        "vendor-json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "MSFT": { "timestamp": [1700000000, 1700086400], "close": [370.0, 372.5] },
        "AAPL": {
            "timestamp": [1700086400, 1700000000, 1700172800],
            "close": [190.0, 189.0, null],
            "open": [189.5, 188.0, 191.0],
            "high": [191.0, null, 192.0],
            "low": [188.5, 187.5, 190.0],
            "volume": [1000, 1200, 900]
        }
    }"#;

    #[test]
    fn test_parse_history_response() {
        let series = parse_history_response(PAYLOAD, StockInterval::OneDay).unwrap();
        assert_eq!(series.len(), 2);

        let aapl = &series[0];
        assert_eq!(aapl.symbol, "AAPL");
        // Null close dropped, remaining bars sorted by time
        assert_eq!(aapl.closes(), vec![189.0, 190.0]);
        assert_eq!(aapl.timestamps(), vec![1_700_000_000_000, 1_700_086_400_000]);
        // Null high falls back to close
        assert_eq!(aapl.highs(), vec![189.0, 191.0]);
        assert_eq!(aapl.volumes(), vec![1200.0, 1000.0]);

        let msft = &series[1];
        assert_eq!(msft.opens(), msft.closes());
        assert_eq!(msft.volumes(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        let mismatched = r#"{ "X": { "timestamp": [1, 2], "close": [1.0] } }"#;
        assert!(matches!(
            parse_history_response(mismatched, StockInterval::OneDay),
            Err(DataError::Parse(_))
        ));

        let missing_close = r#"{ "X": { "timestamp": [1] } }"#;
        assert!(matches!(
            parse_history_response(missing_close, StockInterval::OneDay),
            Err(DataError::Parse(_))
        ));

        let overflowing = r#"{ "X": { "timestamp": [9223372036854776], "close": [1.0] } }"#;
        assert!(matches!(
            parse_history_response(overflowing, StockInterval::OneDay),
            Err(DataError::Parse(_))
        ));

        assert!(matches!(
            parse_history_response("{}", StockInterval::OneDay),
            Err(DataError::Parse(_))
        ));
        assert!(matches!(
            parse_history_response("not json", StockInterval::OneDay),
            Err(DataError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_json_price_source() {
        let source = JsonPriceSource::from_payload(PAYLOAD, StockInterval::OneMonth).unwrap();
        assert_eq!(source.symbols(), vec!["AAPL".to_string(), "MSFT".to_string()]);

        let msft = source.load_history("msft").await.unwrap();
        assert_eq!(msft.interval, StockInterval::OneMonth);
        assert_eq!(msft.closes(), vec![370.0, 372.5]);

        assert!(matches!(
            source.load_history("TSLA").await,
            Err(DataError::NoDataAvailable(_))
        ));
    }
}
