//! Core types and traits for the caishen indicator engine.
//!
//! This crate provides the foundational building blocks including:
//! - Price data types (Bar, PriceSeries)
//! - The indicator output type (`Series`) and its legacy sentinel encoding
//! - Vendor request enums (DateRange, StockInterval)
//! - Core traits for indicators and price sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{CaishenError, CaishenResult, IndicatorResult};
pub use types::*;
pub use traits::*;
