//! Chart traces.
//!
//! Traces serialize to Plotly-style JSON: a candlestick for the price
//! series plus one line per indicator output.

use caishen_core::types::{defined_points, PriceSeries};
use caishen_indicators::IndicatorOutput;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Paired qualitative palette, cycled per line.
const PALETTE: [&str; 9] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
    "#cab2d6",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceKind {
    #[serde(rename = "scatter")]
    Line,
    #[serde(rename = "candlestick")]
    Candlestick,
}

/// Open, high, low and close columns of a candlestick trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcColumns {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

/// One trace of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTrace {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(rename = "legendgroup")]
    pub group: String,
    pub x: Vec<String>,
    /// Line values; empty for candlesticks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub y: Vec<f64>,
    #[serde(flatten)]
    pub ohlc: Option<OhlcColumns>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Candlestick trace for the whole series.
pub fn candlestick_trace(series: &PriceSeries) -> ChartTrace {
    ChartTrace {
        name: series.symbol.clone(),
        kind: TraceKind::Candlestick,
        group: series.symbol.clone(),
        x: series.dates(),
        y: Vec::new(),
        ohlc: Some(OhlcColumns {
            open: series.opens(),
            high: series.highs(),
            low: series.lows(),
            close: series.closes(),
        }),
        color: None,
    }
}

/// One line trace per indicator line, skipping warm-up slots.
///
/// `dates` is indexed like the series the indicators were computed on.
pub fn indicator_traces(symbol: &str, dates: &[String], outputs: &[IndicatorOutput]) -> Vec<ChartTrace> {
    outputs
        .iter()
        .flat_map(|output| output.lines.iter())
        .enumerate()
        .map(|(i, line)| {
            let (x, y) = defined_points(&line.values)
                .filter_map(|(index, value)| dates.get(index).map(|date| (date.clone(), value)))
                .unzip();
            ChartTrace {
                name: format!("{} - {}", symbol, line.name),
                kind: TraceKind::Line,
                group: symbol.to_string(),
                x,
                y,
                ohlc: None,
                color: Some(PALETTE[i % PALETTE.len()].to_string()),
            }
        })
        .collect()
}

/// Figure JSON holding `traces`.
pub fn figure(traces: &[ChartTrace]) -> serde_json::Value {
    json!({
        "data": traces,
        "layout": {
            "margin": { "b": 0, "r": 10, "l": 60, "t": 0 },
            "legend": { "x": 0 }
        }
    })
}
