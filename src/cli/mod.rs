//! CLI definitions.

pub mod commands;

use caishen_core::types::{DateRange, StockInterval};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "caishen")]
#[command(author, version, about = "Technical indicators over stock price history")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute indicators over a price file
    Compute(ComputeArgs),
    /// List available indicators and their defaults
    Indicators,
    /// Build a vendor history request without sending it
    Request(RequestArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Chart,
}

#[derive(clap::Args)]
pub struct ComputeArgs {
    /// Price file (CSV export or saved vendor JSON payload), or a directory
    /// holding `<SYMBOL>.csv` / `<SYMBOL>.json`
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Symbol to load
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// Bar interval of the data
    #[arg(short, long, default_value = "1d")]
    pub interval: StockInterval,

    /// Indicators to compute (comma-separated), e.g. sma,macd,rsi
    #[arg(long, value_delimiter = ',')]
    pub indicators: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save results to file (.csv, otherwise JSON)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct RequestArgs {
    /// Tickers to request (comma-separated, at most 10)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub tickers: Vec<String>,

    /// History range: 1d, 5d, 3mo, 6mo, 1y, 5y
    #[arg(short, long, default_value = "1y")]
    pub range: DateRange,

    /// Bar interval: 1m, 5m, 15m, 1d, 1wk, 1mo
    #[arg(short, long, default_value = "1d")]
    pub interval: StockInterval,

    /// Print the API key instead of masking it
    #[arg(long)]
    pub show_secrets: bool,
}
