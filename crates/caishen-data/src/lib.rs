//! Price-data sources.
//!
//! Loads price history from CSV exports or vendor JSON payloads and builds
//! history requests for the market-data vendor. Nothing here performs
//! network I/O.

mod csv_source;
mod request;
mod vendor;

pub use csv_source::CsvPriceSource;
pub use request::{HistoryRequest, HistoryRequestBuilder, MAX_TICKERS, REQUIRED_ENV_VARS};
pub use vendor::{parse_history_response, JsonPriceSource};

use std::path::Path;

use caishen_core::error::DataError;
use caishen_core::traits::PriceSource;
use caishen_core::types::{PriceSeries, StockInterval};

/// Load a price series from a `.csv` or `.json` file.
///
/// JSON files hold a vendor history payload; `symbol` picks the ticker and
/// may be omitted when the payload holds exactly one.
pub async fn load_series(
    path: impl AsRef<Path>,
    symbol: Option<&str>,
    interval: StockInterval,
) -> Result<PriceSeries, DataError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let source = JsonPriceSource::open(path, interval).await?;
        let symbol = match symbol {
            Some(symbol) => symbol.to_string(),
            None => match source.symbols().as_slice() {
                [only] => only.clone(),
                _ => {
                    return Err(DataError::InvalidRequest(format!(
                        "{} holds several tickers, pick one with a symbol",
                        path.display()
                    )))
                }
            },
        };
        source.load_history(&symbol).await
    } else {
        let symbol = symbol.map(str::to_string).unwrap_or_else(|| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("UNKNOWN")
                .to_uppercase()
        });
        CsvPriceSource::new(path, symbol.as_str(), interval)?
            .load_history(&symbol)
            .await
    }
}
