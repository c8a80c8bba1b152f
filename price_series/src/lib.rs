//! # Price Series
//!
//! `price_series` is a Rust library for typed daily price-bar records.
//! It owns the observation types consumed by the forecasting pipeline and
//! the calendar normalization applied before any model sees the data: a
//! series is reindexed to a contiguous daily calendar and value gaps are
//! filled by linear interpolation.
//!
//! ## Usage Example
//!
//! ```
//! use chrono::NaiveDate;
//! use price_series::{normalize_daily, BarFields, DailyBar, PriceField};
//!
//! let bars = vec![
//!     DailyBar::new(
//!         NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!         BarFields { closing: Some(100.0), ..Default::default() },
//!     ),
//!     DailyBar::new(
//!         NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
//!         BarFields { closing: Some(102.0), ..Default::default() },
//!     ),
//! ];
//!
//! let series = normalize_daily(bars).unwrap();
//! assert_eq!(series.len(), 3);
//! assert_eq!(series[1].data.field(PriceField::Closing), Some(101.0));
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod normalize;
pub mod utils;

pub use normalize::{is_contiguous_daily, normalize_daily};

/// Errors that can occur while building or normalizing a series
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("duplicate date in series: {0}")]
    DuplicateDate(NaiveDate),

    #[error("unknown price field: {0}")]
    UnknownField(String),
}

/// Named numeric fields a daily bar can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    /// Opening price
    Opening,
    /// High price
    High,
    /// Low price
    Low,
    /// Closing price
    Closing,
    /// Traded volume
    Volume,
}

impl PriceField {
    /// All known fields, in export order
    pub const ALL: [PriceField; 5] = [
        PriceField::Opening,
        PriceField::High,
        PriceField::Low,
        PriceField::Closing,
        PriceField::Volume,
    ];

    /// Canonical lowercase name of the field
    pub fn name(&self) -> &'static str {
        match self {
            PriceField::Opening => "opening",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Closing => "closing",
            PriceField::Volume => "volume",
        }
    }

    /// Match a column header against the known field set.
    ///
    /// Accepts the spellings the upstream data files use
    /// (`closing`/`close`/`price`, `opening`/`open`, `volume`/`vol`),
    /// case-insensitively. Unknown headers return `None`.
    pub fn from_column_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "opening" | "open" => Some(PriceField::Opening),
            "high" => Some(PriceField::High),
            "low" => Some(PriceField::Low),
            "closing" | "close" | "price" => Some(PriceField::Closing),
            "volume" | "vol" => Some(PriceField::Volume),
            _ => None,
        }
    }
}

impl std::str::FromStr for PriceField {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_column_name(s).ok_or_else(|| SeriesError::UnknownField(s.to_string()))
    }
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric fields of one daily bar.
///
/// `None` marks a gap: either the calendar day was missing from the input or
/// the field had no value for it. Normalization fills gaps for every field
/// that is known somewhere in the series; a field that is `None` everywhere
/// stays absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BarFields {
    pub opening: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub closing: Option<f64>,
    pub volume: Option<f64>,
}

impl BarFields {
    /// Read a field by name
    pub fn field(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Opening => self.opening,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Closing => self.closing,
            PriceField::Volume => self.volume,
        }
    }

    /// Write a field by name
    pub fn set_field(&mut self, field: PriceField, value: Option<f64>) {
        match field {
            PriceField::Opening => self.opening = value,
            PriceField::High => self.high = value,
            PriceField::Low => self.low = value,
            PriceField::Closing => self.closing = value,
            PriceField::Volume => self.volume = value,
        }
    }
}

/// One calendar day of price data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Date of the data point
    pub date: NaiveDate,
    /// Numeric fields
    pub data: BarFields,
}

impl DailyBar {
    /// Create a bar for a date with the given fields
    pub fn new(date: NaiveDate, data: BarFields) -> Self {
        Self { date, data }
    }

    /// Create an all-gap bar for a missing calendar day
    pub fn gap(date: NaiveDate) -> Self {
        Self {
            date,
            data: BarFields::default(),
        }
    }
}
