//! Core data types.

mod interval;
mod ohlcv;
mod series;

pub use interval::{DateRange, StockInterval};
pub use ohlcv::{Bar, PriceSeries};
pub use series::{defined_points, to_sentinel, undefined, Series, SENTINEL};
