//! Logging setup, reports and chart traces for indicator output.

mod chart;
mod logging;
mod report;

pub use chart::{candlestick_trace, figure, indicator_traces, ChartTrace, OhlcColumns, TraceKind};
pub use logging::setup_logging;
pub use report::IndicatorReport;
