//! Transform strategies between the target series and model space
//!
//! A strategy decides what the model is fitted to and how its raw forecast
//! is converted back into a next-day value in the target field's units.

use crate::error::{ForecastError, Result};
use std::fmt::Debug;

/// Policy over the target series applied around the forecasting model
pub trait TransformStrategy: Debug {
    /// Training sequence for the window ending at `upto` (inclusive)
    fn prepare(&self, values: &[f64], upto: usize) -> Result<Vec<f64>>;

    /// Convert a raw model forecast into a next-day value in original units
    fn reconstruct(&self, values: &[f64], upto: usize, raw_forecast: f64) -> f64;

    /// The intermediate forecasted delta, when the strategy produces one
    fn forecast_delta(&self, raw_forecast: f64) -> Option<f64> {
        let _ = raw_forecast;
        None
    }

    /// Fixed ARIMA order owned by this strategy
    fn order(&self) -> (usize, usize, usize);

    /// Name of the strategy
    fn name(&self) -> &'static str;
}

/// Forecast the raw value series directly
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelTransform;

impl TransformStrategy for LevelTransform {
    fn prepare(&self, values: &[f64], upto: usize) -> Result<Vec<f64>> {
        check_window(values, upto)?;
        Ok(values[..=upto].to_vec())
    }

    fn reconstruct(&self, _values: &[f64], _upto: usize, raw_forecast: f64) -> f64 {
        raw_forecast
    }

    fn order(&self) -> (usize, usize, usize) {
        (1, 1, 1)
    }

    fn name(&self) -> &'static str {
        "level"
    }
}

/// Forecast the first-difference series, then rebuild the absolute value
/// from the last known level
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferencedTransform;

impl TransformStrategy for DifferencedTransform {
    fn prepare(&self, values: &[f64], upto: usize) -> Result<Vec<f64>> {
        check_window(values, upto)?;
        // The first position has no predecessor and is excluded
        Ok(values[..=upto]
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect())
    }

    fn reconstruct(&self, values: &[f64], upto: usize, raw_forecast: f64) -> f64 {
        values[upto] + raw_forecast
    }

    fn forecast_delta(&self, raw_forecast: f64) -> Option<f64> {
        Some(raw_forecast)
    }

    fn order(&self) -> (usize, usize, usize) {
        (1, 0, 1)
    }

    fn name(&self) -> &'static str {
        "differenced"
    }
}

fn check_window(values: &[f64], upto: usize) -> Result<()> {
    if upto >= values.len() {
        return Err(ForecastError::InvalidParameter(format!(
            "window end {} out of range for series of length {}",
            upto,
            values.len()
        )));
    }
    Ok(())
}

/// Which transform strategy the evaluator runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformKind {
    /// Forecast raw values
    #[default]
    Level,
    /// Forecast first differences and reconstruct levels
    Differenced,
}

impl TransformKind {
    /// Build the strategy for this kind
    pub fn strategy(&self) -> Box<dyn TransformStrategy> {
        match self {
            TransformKind::Level => Box::new(LevelTransform),
            TransformKind::Differenced => Box::new(DifferencedTransform),
        }
    }
}

impl std::str::FromStr for TransformKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "level" => Ok(TransformKind::Level),
            "differenced" | "diff" => Ok(TransformKind::Differenced),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown transform strategy '{}'",
                other
            ))),
        }
    }
}
