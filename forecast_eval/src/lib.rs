//! # Forecast Eval
//!
//! A Rust library for walk-forward evaluation of one-step-ahead forecasts
//! over daily price series.
//!
//! ## Features
//!
//! - CSV ingestion into typed daily bars with calendar normalization
//! - Expanding-window ("walk-forward") one-step-ahead evaluation
//! - Two transform strategies: forecast raw levels, or forecast first
//!   differences and reconstruct the level
//! - ARIMA model fitting and one-step forecasting behind a narrow contract
//! - Result assembly with realized-vs-predicted differences, exported as
//!   JSON or CSV
//! - Accuracy metrics (MAE, MSE, RMSE, MAPE, SMAPE, direction)
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_eval::{run_pipeline, EvaluatorConfig, TransformKind};
//!
//! fn main() -> Result<(), forecast_eval::ForecastError> {
//!     // Forecast the closing column of a daily price file
//!     let config = EvaluatorConfig {
//!         transform: TransformKind::Differenced,
//!         ..Default::default()
//!     };
//!
//!     let rows = run_pipeline("RawData.csv", &config)?;
//!     for row in &rows {
//!         println!("{} predicted {:.2} off by {:.2}", row.date, row.predicted, row.difference);
//!     }
//!     Ok(())
//! }
//! ```

use std::path::Path;

pub mod data;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod models;
pub mod report;
pub mod transform;

// Re-export commonly used types
pub use crate::data::DataLoader;
pub use crate::error::{ForecastError, Result};
pub use crate::evaluate::{run_walk_forward, EvaluatorConfig, PredictionRecord};
pub use crate::metrics::{accuracy, BacktestAccuracy};
pub use crate::models::{Arima, ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::report::{assemble, ResultRow};
pub use crate::transform::TransformKind;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Run the full pipeline: load, normalize, evaluate, assemble.
///
/// The input file is read once and never written.
pub fn run_pipeline<P: AsRef<Path>>(path: P, config: &EvaluatorConfig) -> Result<Vec<ResultRow>> {
    let series = DataLoader::load_normalized(path, config.target_field)?;
    let records = run_walk_forward(&series, config)?;
    report::assemble(&series, &records, config)
}
