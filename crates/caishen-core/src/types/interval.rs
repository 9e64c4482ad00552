//! Date ranges and sampling intervals understood by the history vendor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extent of history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateRange {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDay,
    #[serde(rename = "3mo")]
    ThreeMonth,
    #[serde(rename = "6mo")]
    SixMonth,
    #[serde(rename = "1y")]
    #[default]
    OneYear,
    #[serde(rename = "5y")]
    FiveYear,
}

impl DateRange {
    /// Query-string value sent to the vendor.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::OneDay => "1d",
            DateRange::FiveDay => "5d",
            DateRange::ThreeMonth => "3mo",
            DateRange::SixMonth => "6mo",
            DateRange::OneYear => "1y",
            DateRange::FiveYear => "5y",
        }
    }

    /// Get all supported ranges.
    pub fn all() -> &'static [DateRange] {
        &[
            DateRange::OneDay,
            DateRange::FiveDay,
            DateRange::ThreeMonth,
            DateRange::SixMonth,
            DateRange::OneYear,
            DateRange::FiveYear,
        ]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateRange::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Invalid date range: {}", s))
    }
}

/// Sampling interval of a price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StockInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinute,
    #[serde(rename = "15m")]
    FifteenMinute,
    #[serde(rename = "1d")]
    #[default]
    OneDay,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
}

impl StockInterval {
    /// Query-string value sent to the vendor.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockInterval::OneMinute => "1m",
            StockInterval::FiveMinute => "5m",
            StockInterval::FifteenMinute => "15m",
            StockInterval::OneDay => "1d",
            StockInterval::OneWeek => "1wk",
            StockInterval::OneMonth => "1mo",
        }
    }

    /// Get all supported intervals.
    pub fn all() -> &'static [StockInterval] {
        &[
            StockInterval::OneMinute,
            StockInterval::FiveMinute,
            StockInterval::FifteenMinute,
            StockInterval::OneDay,
            StockInterval::OneWeek,
            StockInterval::OneMonth,
        ]
    }
}

impl fmt::Display for StockInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(interval) = StockInterval::all().iter().find(|i| i.as_str() == s) {
            return Ok(*interval);
        }
        match s {
            "1min" => Ok(StockInterval::OneMinute),
            "5min" => Ok(StockInterval::FiveMinute),
            "15min" => Ok(StockInterval::FifteenMinute),
            "day" | "daily" => Ok(StockInterval::OneDay),
            "week" | "weekly" => Ok(StockInterval::OneWeek),
            "month" | "monthly" => Ok(StockInterval::OneMonth),
            _ => Err(format!("Invalid stock interval: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_parse() {
        assert_eq!(DateRange::from_str("1y").unwrap(), DateRange::OneYear);
        assert_eq!(DateRange::from_str("6mo").unwrap(), DateRange::SixMonth);
        assert!(DateRange::from_str("10y").is_err());
        assert!(DateRange::from_str("max").is_err());
    }

    #[test]
    fn test_interval_parse() {
        assert_eq!(StockInterval::from_str("1mo").unwrap(), StockInterval::OneMonth);
        assert_eq!(StockInterval::from_str("daily").unwrap(), StockInterval::OneDay);
        assert!(StockInterval::from_str("5mo").is_err());
    }

    #[test]
    fn test_display_round_trips_through_serde_names() {
        for interval in StockInterval::all() {
            let json = serde_json::to_string(interval).unwrap();
            assert_eq!(json, format!("\"{}\"", interval));
        }
        for range in DateRange::all() {
            let json = serde_json::to_string(range).unwrap();
            assert_eq!(json, format!("\"{}\"", range));
        }
    }
}
