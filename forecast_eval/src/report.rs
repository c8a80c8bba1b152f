//! Result assembly and export
//!
//! Joins each observation with its prediction record, computes the
//! realized-vs-predicted difference, and serializes the surviving rows with
//! an explicit date column.

use crate::error::{ForecastError, Result};
use crate::evaluate::{EvaluatorConfig, PredictionRecord};
use chrono::NaiveDate;
use price_series::DailyBar;
use serde::Serialize;
use std::io::Write;

/// One exported row: an observation joined with its prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// ISO-8601 calendar date
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    /// Point forecast for this day, made from the preceding window
    pub predicted: f64,
    /// Forecasted delta before reconstruction (differenced strategy only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_delta: Option<f64>,
    /// Realized value minus predicted value
    pub difference: f64,
}

/// Join a series with its prediction records.
///
/// Rows without a prediction are dropped, as is the final row, which has no
/// following actual to be compared against. Output order is ascending by
/// date, unchanged from the series.
pub fn assemble(
    series: &[DailyBar],
    records: &[Option<PredictionRecord>],
    config: &EvaluatorConfig,
) -> Result<Vec<ResultRow>> {
    if records.len() != series.len() {
        return Err(ForecastError::InvalidParameter(format!(
            "prediction records ({}) do not align with series ({})",
            records.len(),
            series.len()
        )));
    }

    let mut rows = Vec::new();
    for (index, (bar, record)) in series.iter().zip(records.iter()).enumerate() {
        // The final row is always dropped, prediction or not
        if index + 1 == series.len() {
            break;
        }
        let Some(record) = record else {
            continue;
        };
        let actual = bar.data.field(config.target_field).ok_or_else(|| {
            ForecastError::MissingField(format!(
                "field '{}' absent at {}",
                config.target_field.name(),
                bar.date
            ))
        })?;

        rows.push(ResultRow {
            date: bar.date,
            opening: bar.data.opening,
            high: bar.data.high,
            low: bar.data.low,
            closing: bar.data.closing,
            volume: bar.data.volume,
            predicted: record.predicted,
            forecast_delta: record.forecast_delta,
            difference: actual - record.predicted,
        });
    }

    Ok(rows)
}

/// Write rows as a records-oriented JSON array
pub fn write_json<W: Write>(rows: &[ResultRow], mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Write rows as CSV with one header line
pub fn write_csv<W: Write>(rows: &[ResultRow], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "date",
        "opening",
        "high",
        "low",
        "closing",
        "volume",
        "predicted",
        "forecast_delta",
        "difference",
    ])?;

    for row in rows {
        writer.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            cell(row.opening),
            cell(row.high),
            cell(row.low),
            cell(row.closing),
            cell(row.volume),
            row.predicted.to_string(),
            cell(row.forecast_delta),
            row.difference.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
