//! Compute command implementation.

use anyhow::{Context, Result};
use caishen_config::AppConfig;
use caishen_core::types::PriceSeries;
use caishen_data::load_series;
use caishen_indicators::{IndicatorOutput, IndicatorRequest};
use caishen_monitor::{candlestick_trace, figure, indicator_traces, IndicatorReport};
use std::path::PathBuf;
use tracing::info;

use crate::cli::{ComputeArgs, OutputFormat};

pub async fn run(args: ComputeArgs, config: &AppConfig) -> Result<()> {
    let symbol = args
        .symbol
        .clone()
        .or_else(|| config.data.default_symbol.clone());
    let data_path = resolve_data_path(&args, config, symbol.as_deref())?;

    let series = load_series(&data_path, symbol.as_deref(), args.interval)
        .await
        .with_context(|| format!("Failed to load price data from {}", data_path.display()))?;
    info!(
        "Loaded {} bars of {} from {}",
        series.len(),
        series.symbol,
        data_path.display()
    );

    let requests = select_requests(&args.indicators, &config.indicators)?;
    let outputs = evaluate(&requests, &series)?;
    let report = IndicatorReport::new(&series, outputs);

    let rendered = match args.output {
        OutputFormat::Text => report.summary(),
        OutputFormat::Json => report.to_json()?,
        OutputFormat::Chart => chart_json(&series, &report.outputs)?,
    };
    println!("{}", rendered);

    if let Some(save_path) = &args.save {
        let chart_file = matches!(args.output, OutputFormat::Chart)
            && !save_path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let failed = || format!("Failed to save results to {}", save_path.display());
        if chart_file {
            tokio::fs::write(save_path, chart_json(&series, &report.outputs)?)
                .await
                .with_context(failed)?;
        } else {
            report.save(save_path).with_context(failed)?;
        }
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

/// Explicit `--data`, else `<data.directory>/<SYMBOL>.{csv,json}`.
fn resolve_data_path(args: &ComputeArgs, config: &AppConfig, symbol: Option<&str>) -> Result<PathBuf> {
    let base = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.data.directory));

    if !base.exists() {
        anyhow::bail!(
            "Data path '{}' does not exist. Provide a CSV or JSON file, or a directory of them (e.g. --data ./data)",
            base.display()
        );
    }
    if base.is_file() {
        return Ok(base);
    }

    let Some(symbol) = symbol else {
        anyhow::bail!("--data is a directory, pick a file inside it with --symbol");
    };
    let lower = symbol.to_lowercase();
    let candidates = [
        base.join(format!("{}.csv", symbol)),
        base.join(format!("{}.csv", lower)),
        base.join(format!("{}.json", symbol)),
        base.join(format!("{}.json", lower)),
    ];

    candidates
        .into_iter()
        .find(|path| path.is_file())
        .with_context(|| format!("No price file for {} in {}", symbol, base.display()))
}

/// CLI list first, then the config list, then every indicator's defaults.
fn select_requests(
    cli: &[String],
    configured: &[serde_json::Value],
) -> Result<Vec<IndicatorRequest>> {
    let requests = if !cli.is_empty() {
        cli.iter()
            .map(|kind| IndicatorRequest::defaults(kind.trim()))
            .collect::<Result<Vec<_>, _>>()
    } else if !configured.is_empty() {
        configured
            .iter()
            .map(IndicatorRequest::from_value)
            .collect::<Result<Vec<_>, _>>()
    } else {
        Ok(IndicatorRequest::catalog()
            .into_iter()
            .map(|info| info.defaults)
            .collect())
    };

    requests.context("Invalid indicator selection")
}

fn evaluate(requests: &[IndicatorRequest], series: &PriceSeries) -> Result<Vec<IndicatorOutput>> {
    requests
        .iter()
        .map(|request| {
            request
                .evaluate(series)
                .with_context(|| format!("Failed to compute {}", request.label()))
        })
        .collect()
}

fn chart_json(series: &PriceSeries, outputs: &[IndicatorOutput]) -> Result<String> {
    let mut traces = vec![candlestick_trace(series)];
    traces.extend(indicator_traces(&series.symbol, &series.dates(), outputs));
    Ok(serde_json::to_string_pretty(&figure(&traces))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_requests_precedence() {
        let configured = vec![json!({"kind": "rsi", "lookback": 7})];

        let from_cli = select_requests(&["sma".to_string()], &configured).unwrap();
        assert_eq!(from_cli, vec![IndicatorRequest::Sma { lookback: 14 }]);

        let from_config = select_requests(&[], &configured).unwrap();
        assert_eq!(from_config, vec![IndicatorRequest::Rsi { lookback: 7 }]);

        let all = select_requests(&[], &[]).unwrap();
        assert_eq!(all.len(), IndicatorRequest::catalog().len());
    }

    #[test]
    fn test_select_requests_rejects_unknown() {
        assert!(select_requests(&["vwap".to_string()], &[]).is_err());
        assert!(select_requests(&[], &[json!({"kind": "sma", "lookback": 1.5})]).is_err());
    }
}
