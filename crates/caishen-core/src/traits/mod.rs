//! Core traits.

mod indicator;
mod price_source;

pub use indicator::{HlcIndicator, Indicator, MultiOutputIndicator};
pub use price_source::PriceSource;
