//! Accuracy metrics over an evaluated backtest trace

use crate::error::{ForecastError, Result};
use crate::report::ResultRow;

/// Accuracy metrics for a set of one-step-ahead predictions
#[derive(Debug, Clone)]
pub struct BacktestAccuracy {
    /// Number of evaluated rows
    pub rows: usize,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
    /// Direction accuracy percentage
    pub direction_accuracy: f64,
}

/// Evaluate prediction accuracy over the exported trace.
///
/// The realized value is recovered from each row's prediction and
/// difference, so the summary stays consistent with the export whatever the
/// target field was.
pub fn accuracy(rows: &[ResultRow]) -> Result<BacktestAccuracy> {
    if rows.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "No evaluated rows to summarize".to_string(),
        ));
    }

    let n = rows.len() as f64;
    let actual: Vec<f64> = rows.iter().map(|row| row.predicted + row.difference).collect();
    let forecast: Vec<f64> = rows.iter().map(|row| row.predicted).collect();

    let errors: Vec<f64> = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| a - f)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let mape = actual
        .iter()
        .zip(errors.iter())
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, e)| (e.abs() / a.abs()) * 100.0)
        .sum::<f64>()
        / n;

    let smape = actual
        .iter()
        .zip(forecast.iter())
        .map(|(a, f)| {
            let denominator = a.abs() + f.abs();
            if denominator == 0.0 {
                0.0
            } else {
                200.0 * (a - f).abs() / denominator
            }
        })
        .sum::<f64>()
        / n;

    // Direction accuracy: did the forecast move the same way as the realized
    // series between consecutive evaluated rows
    let direction_correct = actual
        .windows(2)
        .zip(forecast.windows(2))
        .filter(|(a, f)| (a[1] - a[0]).abs() > 1e-10 && (f[1] - f[0]).abs() > 1e-10)
        .filter(|(a, f)| (a[1] > a[0]) == (f[1] > f[0]))
        .count();
    let direction_total = actual
        .windows(2)
        .zip(forecast.windows(2))
        .filter(|(a, f)| (a[1] - a[0]).abs() > 1e-10 && (f[1] - f[0]).abs() > 1e-10)
        .count();
    let direction_accuracy = if direction_total > 0 {
        direction_correct as f64 / direction_total as f64 * 100.0
    } else {
        0.0
    };

    Ok(BacktestAccuracy {
        rows: rows.len(),
        mae,
        mse,
        rmse,
        mape,
        smape,
        direction_accuracy,
    })
}

impl std::fmt::Display for BacktestAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Backtest Accuracy Metrics:")?;
        writeln!(f, "  Rows:      {}", self.rows)?;
        writeln!(f, "  MAE:       {:.4}", self.mae)?;
        writeln!(f, "  MSE:       {:.4}", self.mse)?;
        writeln!(f, "  RMSE:      {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:      {:.4}%", self.mape)?;
        writeln!(f, "  SMAPE:     {:.4}%", self.smape)?;
        writeln!(f, "  Direction: {:.2}%", self.direction_accuracy)?;
        Ok(())
    }
}
