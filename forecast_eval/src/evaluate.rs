//! Walk-forward evaluation engine
//!
//! For each eligible step the engine fits the model to everything observed
//! so far and predicts the next day's value, attaching the prediction to the
//! row it will eventually be compared against. The training window expands
//! one day at a time and never sees past its own end.

use crate::error::{ForecastError, Result};
use crate::models::fit_and_forecast_one_step;
use crate::transform::TransformKind;
use price_series::{DailyBar, PriceField};
use tracing::{info, warn};

/// Configuration for a walk-forward run
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Numeric field the forecasts target
    pub target_field: PriceField,
    /// Minimum training size before the first forecast is attempted
    pub warmup_length: usize,
    /// Transform strategy applied around the model
    pub transform: TransformKind,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            target_field: PriceField::Closing,
            warmup_length: 5,
            transform: TransformKind::Level,
        }
    }
}

impl EvaluatorConfig {
    /// Validate the configuration.
    ///
    /// A warm-up below 2 would hand the differenced strategy a training
    /// sequence of fewer than 2 effective observations.
    pub fn validate(&self) -> Result<()> {
        if self.warmup_length < 2 {
            return Err(ForecastError::InvalidParameter(
                "Warm-up length must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// One-step-ahead prediction attached to a single observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionRecord {
    /// Point forecast in the target field's units
    pub predicted: f64,
    /// Intermediate forecasted delta (differenced strategy only)
    pub forecast_delta: Option<f64>,
}

/// Run the expanding-window evaluation over a normalized series.
///
/// Returns one slot per observation. The slot at index `i + 1` holds the
/// prediction made from the training prefix `0..=i`, or `None` for warm-up
/// rows and windows whose fit failed. A failed window is logged and skipped;
/// it never aborts the run.
pub fn run_walk_forward(
    series: &[DailyBar],
    config: &EvaluatorConfig,
) -> Result<Vec<Option<PredictionRecord>>> {
    config.validate()?;

    let values = target_values(series, config.target_field)?;
    let strategy = config.transform.strategy();
    let order = strategy.order();

    let mut records: Vec<Option<PredictionRecord>> = vec![None; series.len()];
    if series.len() < config.warmup_length + 2 {
        info!(
            rows = series.len(),
            warmup = config.warmup_length,
            "series too short for any forecast window"
        );
        return Ok(records);
    }

    let mut skipped = 0usize;
    for i in config.warmup_length..=series.len() - 2 {
        let training = strategy.prepare(&values, i)?;
        match fit_and_forecast_one_step(&training, order) {
            Ok(raw_forecast) => {
                let predicted = strategy.reconstruct(&values, i, raw_forecast);
                if !predicted.is_finite() {
                    skipped += 1;
                    warn!(index = i, window = training.len(), "non-finite prediction, skipping window");
                    continue;
                }
                records[i + 1] = Some(PredictionRecord {
                    predicted,
                    forecast_delta: strategy.forecast_delta(raw_forecast),
                });
            }
            Err(err) => {
                skipped += 1;
                warn!(
                    index = i,
                    window = training.len(),
                    error = %err,
                    "per-step fit failure, skipping window"
                );
            }
        }
    }

    let produced = records.iter().filter(|record| record.is_some()).count();
    info!(
        produced,
        skipped,
        strategy = strategy.name(),
        "walk-forward pass complete"
    );

    Ok(records)
}

fn target_values(series: &[DailyBar], field: PriceField) -> Result<Vec<f64>> {
    series
        .iter()
        .map(|bar| {
            bar.data.field(field).ok_or_else(|| {
                ForecastError::MissingField(format!(
                    "field '{}' absent at {}",
                    field.name(),
                    bar.date
                ))
            })
        })
        .collect()
}
