//! CSV ingestion for daily price data

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use price_series::{normalize_daily, BarFields, DailyBar, PriceField};
use std::path::Path;

/// Data loader for daily price observations
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load daily bars from a CSV file.
    ///
    /// The header must contain a date column; price columns are matched
    /// case-insensitively against the known field set. Empty numeric cells
    /// are treated as gaps. Unrecognized columns are ignored.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<DailyBar>> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let date_index = Self::detect_date_column(&headers)?;
        let field_columns = Self::detect_price_columns(&headers);
        if field_columns.is_empty() {
            return Err(ForecastError::MalformedInput(
                "no recognized numeric columns in header".to_string(),
            ));
        }

        let mut bars = Vec::new();
        for record in reader.records() {
            let record = record?;
            let date = parse_date(record.get(date_index).unwrap_or(""))?;

            let mut data = BarFields::default();
            for &(index, field) in &field_columns {
                let cell = record.get(index).unwrap_or("").trim();
                if cell.is_empty() {
                    continue;
                }
                let value = cell.parse::<f64>().map_err(|_| {
                    ForecastError::MalformedInput(format!(
                        "unparseable value '{}' in column '{}' at {}",
                        cell,
                        field.name(),
                        date
                    ))
                })?;
                data.set_field(field, Some(value));
            }

            bars.push(DailyBar::new(date, data));
        }

        Ok(bars)
    }

    /// Load a file, normalize it to a contiguous daily calendar, and require
    /// the target field to be present afterwards.
    pub fn load_normalized<P: AsRef<Path>>(path: P, target: PriceField) -> Result<Vec<DailyBar>> {
        let bars = Self::from_csv(path)?;
        let series = normalize_daily(bars)?;

        if series.iter().all(|bar| bar.data.field(target).is_none()) {
            return Err(ForecastError::MissingField(format!(
                "target field '{}' not present in input",
                target.name()
            )));
        }

        Ok(series)
    }

    /// Detect the date column in the header
    fn detect_date_column(headers: &csv::StringRecord) -> Result<usize> {
        for (index, name) in headers.iter().enumerate() {
            let lower = name.trim().to_lowercase();
            if lower.contains("date") || lower.contains("time") {
                return Ok(index);
            }
        }

        Err(ForecastError::MalformedInput(
            "no date column found in header".to_string(),
        ))
    }

    /// Detect known price columns in the header
    fn detect_price_columns(headers: &csv::StringRecord) -> Vec<(usize, PriceField)> {
        headers
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                PriceField::from_column_name(name).map(|field| (index, field))
            })
            .collect()
    }
}

/// Parse a calendar date in dashed or slashed form.
///
/// Upstream exports write `2024/03/01`; hand-written fixtures use
/// `2024-03-01`. Both are accepted.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .map_err(|_| ForecastError::MalformedInput(format!("unparseable date '{}'", trimmed)))
}
