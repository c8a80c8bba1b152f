use chrono::NaiveDate;
use forecast_eval::report::{write_csv, write_json};
use forecast_eval::{assemble, run_walk_forward, EvaluatorConfig, ForecastError};
use price_series::{BarFields, DailyBar};

use assert_approx_eq::assert_approx_eq;
use pretty_assertions::assert_eq;

fn series_from_closings(closings: &[f64]) -> Vec<DailyBar> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    closings
        .iter()
        .enumerate()
        .map(|(offset, &closing)| {
            DailyBar::new(
                start + chrono::Duration::days(offset as i64),
                BarFields {
                    closing: Some(closing),
                    ..Default::default()
                },
            )
        })
        .collect()
}

fn scenario_closings() -> Vec<f64> {
    vec![100.0, 101.0, 99.0, 102.0, 103.0, 105.0, 104.0, 106.0, 108.0, 107.0]
}

#[test]
fn warmup_rows_and_final_row_are_dropped() {
    let series = series_from_closings(&scenario_closings());
    let config = EvaluatorConfig::default();

    let records = run_walk_forward(&series, &config).unwrap();
    let rows = assemble(&series, &records, &config).unwrap();

    // Indices 6..=9 carry predictions, but the final row is always dropped.
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].date.to_string(), "2023-01-07");
    assert_eq!(rows[1].date.to_string(), "2023-01-08");
    assert_eq!(rows[2].date.to_string(), "2023-01-09");
}

#[test]
fn difference_is_actual_minus_predicted() {
    let series = series_from_closings(&scenario_closings());
    let config = EvaluatorConfig::default();

    let records = run_walk_forward(&series, &config).unwrap();
    let rows = assemble(&series, &records, &config).unwrap();

    for row in &rows {
        let actual = row.closing.unwrap();
        assert_approx_eq!(row.difference, actual - row.predicted, 1e-12);
    }
}

#[test]
fn rows_stay_in_ascending_date_order() {
    let series = series_from_closings(&scenario_closings());
    let config = EvaluatorConfig::default();

    let records = run_walk_forward(&series, &config).unwrap();
    let rows = assemble(&series, &records, &config).unwrap();

    assert!(rows.windows(2).all(|pair| pair[0].date < pair[1].date));
}

#[test]
fn misaligned_records_are_rejected() {
    let series = series_from_closings(&scenario_closings());
    let config = EvaluatorConfig::default();

    let err = assemble(&series, &[None, None], &config).unwrap_err();

    assert!(matches!(err, ForecastError::InvalidParameter(_)));
}

#[test]
fn json_export_is_a_records_array_with_iso_dates() {
    let series = series_from_closings(&scenario_closings());
    let config = EvaluatorConfig::default();

    let records = run_walk_forward(&series, &config).unwrap();
    let rows = assemble(&series, &records, &config).unwrap();

    let mut buffer = Vec::new();
    write_json(&rows, &mut buffer).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

    let array = parsed.as_array().unwrap();
    assert_eq!(array.len(), rows.len());
    assert_eq!(array[0]["date"], "2023-01-07");
    assert!(array[0]["predicted"].is_f64());
    assert!(array[0]["difference"].is_f64());
    assert!(array[0]["closing"].is_f64());
    // Level runs carry no delta, and absent fields are not serialized
    assert!(array[0].get("forecast_delta").is_none());
    assert!(array[0].get("opening").is_none());
}

#[test]
fn csv_export_has_a_header_and_one_line_per_row() {
    let series = series_from_closings(&scenario_closings());
    let config = EvaluatorConfig::default();

    let records = run_walk_forward(&series, &config).unwrap();
    let rows = assemble(&series, &records, &config).unwrap();

    let mut buffer = Vec::new();
    write_csv(&rows, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), rows.len() + 1);
    assert!(lines[0].starts_with("date,opening,high,low,closing"));
    assert!(lines[1].starts_with("2023-01-07,"));
}

#[test]
fn empty_trace_exports_an_empty_array() {
    let rows = Vec::new();

    let mut buffer = Vec::new();
    write_json(&rows, &mut buffer).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

    assert_eq!(parsed.as_array().unwrap().len(), 0);
}
