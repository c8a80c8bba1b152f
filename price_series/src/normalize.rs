//! Calendar normalization for daily bar series

use crate::{DailyBar, PriceField, SeriesError};

/// Reindex a series to a contiguous daily calendar and fill value gaps.
///
/// Bars are sorted by date ascending; duplicate dates are rejected. Every
/// calendar day between the first and last observation gets a bar, with
/// missing days inserted as gaps. Each field that is known anywhere in the
/// series is then filled: interior gaps by linear interpolation between the
/// nearest known neighbors, edge gaps by holding the nearest known value.
/// A field with no known values anywhere is left absent.
///
/// Normalizing an already gap-free, sorted series returns it unchanged.
pub fn normalize_daily(mut bars: Vec<DailyBar>) -> Result<Vec<DailyBar>, SeriesError> {
    if bars.is_empty() {
        return Err(SeriesError::Empty);
    }

    bars.sort_by_key(|bar| bar.date);
    for pair in bars.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(SeriesError::DuplicateDate(pair[0].date));
        }
    }

    let first = bars[0].date;
    let last = bars[bars.len() - 1].date;

    let mut filled = Vec::with_capacity((last - first).num_days() as usize + 1);
    let mut source = bars.into_iter().peekable();
    for date in first.iter_days().take_while(|date| *date <= last) {
        match source.next_if(|bar| bar.date == date) {
            Some(bar) => filled.push(bar),
            None => filled.push(DailyBar::gap(date)),
        }
    }

    for field in PriceField::ALL {
        interpolate_field(&mut filled, field);
    }

    Ok(filled)
}

/// Check that consecutive bars are exactly one calendar day apart
pub fn is_contiguous_daily(bars: &[DailyBar]) -> bool {
    bars.windows(2)
        .all(|pair| pair[0].date.succ_opt() == Some(pair[1].date))
}

fn interpolate_field(bars: &mut [DailyBar], field: PriceField) {
    let known: Vec<usize> = bars
        .iter()
        .enumerate()
        .filter(|(_, bar)| bar.data.field(field).is_some())
        .map(|(index, _)| index)
        .collect();

    // Field absent everywhere: nothing to fill
    let (Some(&first), Some(&last)) = (known.first(), known.last()) else {
        return;
    };

    // Edge gaps hold the nearest known value
    let first_value = bars[first].data.field(field);
    for index in 0..first {
        bars[index].data.set_field(field, first_value);
    }
    let last_value = bars[last].data.field(field);
    for index in last + 1..bars.len() {
        bars[index].data.set_field(field, last_value);
    }

    // Interior gaps interpolate between the nearest known neighbors
    for pair in known.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo <= 1 {
            continue;
        }
        let (Some(a), Some(b)) = (bars[lo].data.field(field), bars[hi].data.field(field)) else {
            continue;
        };
        let span = (hi - lo) as f64;
        for index in lo + 1..hi {
            let t = (index - lo) as f64 / span;
            bars[index].data.set_field(field, Some(a + (b - a) * t));
        }
    }
}
