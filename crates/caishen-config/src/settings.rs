//! Configuration structures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Configuration errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub vendor: VendorSettings,
    /// Indicator requests, either a bare name or a table with a `kind`.
    #[serde(default)]
    pub indicators: Vec<serde_json::Value>,
}

impl AppConfig {
    /// Check values the type system cannot.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(SettingsError::Invalid(format!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(SettingsError::Invalid(format!(
                "logging.format must be one of {:?}, got {:?}",
                LOG_FORMATS, self.logging.format
            )));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "caishen".to_string(),
            environment: default_environment(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Optional log file, written alongside the console output.
    #[serde(default)]
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Where price files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    pub directory: String,
    #[serde(default)]
    pub default_symbol: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            directory: "data".to_string(),
            default_symbol: None,
        }
    }
}

/// Names of the environment variables holding vendor credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorSettings {
    pub host_env: String,
    pub endpoint_env: String,
    pub token_env: String,
}

impl Default for VendorSettings {
    fn default() -> Self {
        Self {
            host_env: "RAPIDAPI_HOST".to_string(),
            endpoint_env: "RAPIDAPI_ENDPOINT".to_string(),
            token_env: "RAPID_API_TOKEN".to_string(),
        }
    }
}
