//! List indicators command.

use anyhow::Result;
use caishen_indicators::IndicatorRequest;

pub async fn run() -> Result<()> {
    println!("Available Indicators");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in IndicatorRequest::catalog() {
        println!("  {} ", info.kind);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  defaults: {}", serde_json::to_string(&info.defaults)?);
        println!();
    }

    println!("Use --indicators <name,...> to select indicators, or list them in the");
    println!("config file with parameters, e.g. {{ kind = \"sma\", lookback = 20 }}.");

    Ok(())
}
