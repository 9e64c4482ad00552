//! Validate configuration command.

use anyhow::Result;
use caishen_config::{AppConfig, SettingsError};
use caishen_indicators::IndicatorRequest;
use std::path::Path;

pub fn run(config_path: &Path, loaded: Result<AppConfig, SettingsError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    let mut invalid = 0;
    let mut requests = Vec::with_capacity(config.indicators.len());
    for value in &config.indicators {
        match IndicatorRequest::from_value(value) {
            Ok(request) => requests.push(request),
            Err(e) => {
                println!("Indicator {} is invalid: {}", value, e);
                invalid += 1;
            }
        }
    }
    if invalid > 0 {
        anyhow::bail!("{} invalid indicator entries in {:?}", invalid, config_path);
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Log format: {}", config.logging.format);
    println!("Data directory: {}", config.data.directory);
    println!(
        "Vendor variables: {}, {}, {}",
        config.vendor.host_env, config.vendor.endpoint_env, config.vendor.token_env
    );
    let labels: Vec<String> = requests.iter().map(IndicatorRequest::label).collect();
    println!("Indicators: {}", labels.join(", "));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_loaded_config() {
        let path = Path::new("config/default.toml");

        let mut config = AppConfig::default();
        config.indicators = vec![json!("sma"), json!({"kind": "rsi", "lookback": 7})];
        assert!(run(path, Ok(config.clone())).is_ok());

        config.indicators.push(json!({"kind": "ema", "lookback": 2.5}));
        assert!(run(path, Ok(config)).is_err());

        let load_error = SettingsError::Invalid("no indicators table".to_string());
        assert!(run(path, Err(load_error)).is_err());
    }
}
