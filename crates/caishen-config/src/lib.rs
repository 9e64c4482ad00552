//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig, SettingsError, VendorSettings};

use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Environment variable prefix, e.g. `CAISHEN__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "CAISHEN";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: AppConfig = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

/// Parse configuration from TOML text, without environment overrides.
pub fn parse_config(content: &str) -> Result<AppConfig, SettingsError> {
    let config = Config::builder()
        .add_source(File::from_str(content, FileFormat::Toml))
        .build()?;

    let settings: AppConfig = config.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}
