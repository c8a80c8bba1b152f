//! Utility helpers for building test and demo series

use crate::{BarFields, DailyBar};
use chrono::NaiveDate;

/// Generate dummy daily bars for testing purposes
///
/// Produces a random walk starting at `starting_price`, with open, high,
/// low, closing, and volume populated for every day.
///
/// # Arguments
/// * `num_points` - Number of data points to generate
/// * `starting_price` - Initial price for the first data point
/// * `volatility` - Price volatility factor (0.0-1.0)
pub fn generate_test_series(
    num_points: usize,
    starting_price: f64,
    volatility: f64,
) -> Vec<DailyBar> {
    use rand::{thread_rng, Rng};

    let mut rng = thread_rng();
    let mut bars = Vec::with_capacity(num_points);
    let mut date = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid calendar date");
    let mut price = starting_price;

    for _ in 0..num_points {
        let change = rng.gen_range(-volatility..volatility);
        let opening = price;
        let closing = (opening * (1.0 + change)).max(0.01);
        let high = opening.max(closing) * (1.0 + rng.gen_range(0.0..volatility / 2.0));
        let low = opening.min(closing) * (1.0 - rng.gen_range(0.0..volatility / 2.0));
        let volume = rng.gen_range(1_000.0..10_000.0);

        bars.push(DailyBar::new(
            date,
            BarFields {
                opening: Some(opening),
                high: Some(high),
                low: Some(low),
                closing: Some(closing),
                volume: Some(volume),
            },
        ));

        price = closing;
        date = date.succ_opt().expect("valid calendar date");
    }

    bars
}
