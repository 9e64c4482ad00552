//! Indicator report generation.

use std::io;
use std::path::Path;

use caishen_core::error::CaishenResult;
use caishen_core::types::{PriceSeries, StockInterval};
use caishen_indicators::IndicatorOutput;
use serde::{Deserialize, Serialize};

/// Indicators computed over one price series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub symbol: String,
    pub interval: StockInterval,
    /// Bar dates, RFC 3339
    pub dates: Vec<String>,
    pub closes: Vec<f64>,
    pub outputs: Vec<IndicatorOutput>,
}

impl IndicatorReport {
    pub fn new(series: &PriceSeries, outputs: Vec<IndicatorOutput>) -> Self {
        Self {
            symbol: series.symbol.clone(),
            interval: series.interval,
            dates: series.dates(),
            closes: series.closes(),
            outputs,
        }
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                    INDICATOR REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("SERIES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Symbol:              {}\n", self.symbol));
        s.push_str(&format!("  Interval:            {}\n", self.interval));
        s.push_str(&format!("  Bars:                {}\n", self.dates.len()));
        if let (Some(first), Some(last)) = (self.dates.first(), self.dates.last()) {
            s.push_str(&format!("  From:                {}\n", first));
            s.push_str(&format!("  To:                  {}\n", last));
        }
        if let Some(close) = self.closes.last() {
            s.push_str(&format!("  Last Close:          {:.4}\n", close));
        }
        s.push('\n');

        for output in &self.outputs {
            s.push_str(&format!("{}\n", output.name));
            s.push_str("───────────────────────────────────────────────────────────\n");
            for line in &output.lines {
                let defined = line.values.iter().filter(|v| v.is_some()).count();
                let latest = line
                    .values
                    .last()
                    .copied()
                    .flatten()
                    .map_or_else(|| "undefined".to_string(), |v| format!("{:.4}", v));
                s.push_str(&format!(
                    "  {:<28} {:>12}   ({}/{} defined)\n",
                    line.name,
                    latest,
                    defined,
                    line.values.len()
                ));
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV, one column per indicator line. Undefined cells are empty.
    pub fn to_csv(&self) -> CaishenResult<String> {
        let lines: Vec<_> = self.outputs.iter().flat_map(|o| o.lines.iter()).collect();
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["date", "close"];
        header.extend(lines.iter().map(|line| line.name.as_str()));
        writer.write_record(&header).map_err(io::Error::from)?;

        for (i, (date, close)) in self.dates.iter().zip(&self.closes).enumerate() {
            let mut row = vec![date.clone(), close.to_string()];
            row.extend(lines.iter().map(|line| {
                line.values
                    .get(i)
                    .copied()
                    .flatten()
                    .map_or_else(String::new, |value| value.to_string())
            }));
            writer.write_record(&row).map_err(io::Error::from)?;
        }

        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }

    /// Write the report to `path`: CSV for a `.csv` extension, JSON otherwise.
    pub fn save(&self, path: &Path) -> CaishenResult<()> {
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let content = if is_csv { self.to_csv()? } else { self.to_json()? };
        std::fs::write(path, content)?;
        Ok(())
    }
}
