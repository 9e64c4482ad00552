//! CSV price source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use caishen_core::error::DataError;
use caishen_core::traits::PriceSource;
use caishen_core::types::{Bar, PriceSeries, StockInterval};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Price history for one symbol stored as a CSV export.
pub struct CsvPriceSource {
    path: PathBuf,
    symbol: String,
    interval: StockInterval,
}

impl CsvPriceSource {
    /// Create a source for `symbol` backed by the file at `path`.
    pub fn new(
        path: impl AsRef<Path>,
        symbol: impl Into<String>,
        interval: StockInterval,
    ) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            symbol: symbol.into(),
            interval,
        })
    }

    /// Parse CSV text into bars sorted by timestamp.
    fn parse_bars(&self, content: &str) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::Parse(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;

            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        bars.sort_by_key(|b| b.timestamp);

        Ok(bars)
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn load_history(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        if !symbol.eq_ignore_ascii_case(&self.symbol) {
            return Err(DataError::NoDataAvailable(symbol.to_string()));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|_| DataError::NotFound(self.path.display().to_string()))?;

        let bars = self.parse_bars(&content)?;
        if bars.is_empty() {
            return Err(DataError::NoDataAvailable(symbol.to_string()));
        }

        info!(
            symbol = %self.symbol,
            bars = bars.len(),
            path = %self.path.display(),
            "Loaded CSV history"
        );

        Ok(PriceSeries::from_bars(self.symbol.clone(), self.interval, bars))
    }

    fn symbols(&self) -> Vec<String> {
        vec![self.symbol.clone()]
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse a date cell into Unix milliseconds.
pub(crate) fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let formats = [
        "%Y-%m-%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
        if let Some(dt) = NaiveDate::parse_from_str(date_str, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    if let Ok(ts) = date_str.parse::<i64>() {
        debug!(raw = ts, "Treating date cell as a Unix timestamp");
        // More than 10 digits means milliseconds
        if ts > 10_000_000_000 {
            return Ok(ts);
        }
        return ts
            .checked_mul(1000)
            .ok_or_else(|| DataError::Parse(format!("Timestamp out of range: {}", date_str)));
    }

    Err(DataError::Parse(format!("Could not parse date: {}", date_str)))
}
