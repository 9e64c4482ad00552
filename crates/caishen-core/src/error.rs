//! Error types for the caishen workspace.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum CaishenError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Indicator computation errors.
///
/// Raised before any computation starts; an indicator never returns a partial
/// result alongside an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    /// Empty sequence, out-of-range parameter or length mismatch.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A parameter of the wrong kind, e.g. a fractional lookback.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
}

impl IndicatorError {
    /// The error raised for an empty input sequence.
    pub fn empty_values() -> Self {
        IndicatorError::InvalidInput(
            "The length of the values list is 0. It should be at least 1".to_string(),
        )
    }
}

/// Price data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    NotFound(String),

    #[error("No data available for {0}")]
    NoDataAvailable(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing {0} from environment variables")]
    MissingEnvVar(String),
}

/// Result type alias for indicator computations.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// Result type alias for workspace-level operations.
pub type CaishenResult<T> = Result<T, CaishenError>;
