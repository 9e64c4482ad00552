//! Price source trait definitions.

use crate::error::DataError;
use crate::types::PriceSeries;
use async_trait::async_trait;

/// Trait for historical price sources.
///
/// Sources hand the indicator engine already-aligned series; no indicator
/// validates dates or reorders bars.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Load the full history of a symbol, ordered from oldest to newest.
    async fn load_history(&self, symbol: &str) -> Result<PriceSeries, DataError>;

    /// Symbols this source can serve.
    fn symbols(&self) -> Vec<String>;

    /// Get the source name.
    fn name(&self) -> &str;
}
