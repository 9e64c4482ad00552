//! Vendor request command.

use anyhow::{Context, Result};
use caishen_config::VendorSettings;
use caishen_data::HistoryRequestBuilder;
use tracing::info;

use crate::cli::RequestArgs;

pub fn run(args: RequestArgs, vendor: &VendorSettings) -> Result<()> {
    let request = HistoryRequestBuilder::new()
        .tickers(args.tickers.iter().map(|t| t.trim().to_uppercase()))
        .range(args.range)
        .interval(args.interval)
        .env_names(&vendor.host_env, &vendor.endpoint_env, &vendor.token_env)
        .build()
        .context("Failed to build history request")?;

    info!(url = %request.url, "History request ready");

    let printable = if args.show_secrets {
        request
    } else {
        request.redacted()
    };
    println!("{}", serde_json::to_string_pretty(&printable)?);

    Ok(())
}
