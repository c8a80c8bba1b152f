//! Error types for the forecast_eval crate

use price_series::SeriesError;
use thiserror::Error;

/// Custom error types for the forecast_eval crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Input rows that cannot be parsed into daily observations
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Required target field absent after normalization
    #[error("Missing field: {0}")]
    MissingField(String),

    /// A single window's model fit or forecast failed
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from CSV parsing or writing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<SeriesError> for ForecastError {
    fn from(err: SeriesError) -> Self {
        ForecastError::MalformedInput(err.to_string())
    }
}
