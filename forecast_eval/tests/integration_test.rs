use forecast_eval::data::DataLoader;
use forecast_eval::report::{write_csv, write_json};
use forecast_eval::{
    assemble, run_pipeline, run_walk_forward, EvaluatorConfig, ForecastError, TransformKind,
};
use price_series::{is_contiguous_daily, PriceField};
use std::io::Write;
use tempfile::NamedTempFile;

use assert_approx_eq::assert_approx_eq;

/// Twelve calendar days of closing prices with 2023-01-06 missing
fn fixture_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,opening,closing,volume").unwrap();
    writeln!(file, "2023-01-01,99.5,100.0,1000").unwrap();
    writeln!(file, "2023-01-02,100.2,101.0,1100").unwrap();
    writeln!(file, "2023-01-03,100.8,99.0,900").unwrap();
    writeln!(file, "2023-01-04,99.1,102.0,1250").unwrap();
    writeln!(file, "2023-01-05,101.9,103.0,1300").unwrap();
    writeln!(file, "2023-01-07,103.4,104.0,1200").unwrap();
    writeln!(file, "2023-01-08,104.2,106.0,1400").unwrap();
    writeln!(file, "2023-01-09,105.7,108.0,1600").unwrap();
    writeln!(file, "2023-01-10,107.5,107.0,1500").unwrap();
    writeln!(file, "2023-01-11,107.1,109.0,1700").unwrap();
    writeln!(file, "2023-01-12,108.8,111.0,1800").unwrap();
    file
}

#[test]
fn pipeline_produces_an_evaluated_trace() {
    let file = fixture_file();

    let rows = run_pipeline(file.path(), &EvaluatorConfig::default()).unwrap();

    assert!(!rows.is_empty());
    for row in &rows {
        assert!(row.predicted.is_finite());
        assert_approx_eq!(row.difference, row.closing.unwrap() - row.predicted, 1e-12);
        // Every exported row sits past the warm-up and before the last day
        assert!(row.date.to_string() >= "2023-01-07".to_string());
        assert!(row.date.to_string() < "2023-01-12".to_string());
    }
}

#[test]
fn pipeline_fills_the_missing_calendar_day() {
    let file = fixture_file();

    let series = DataLoader::load_normalized(file.path(), PriceField::Closing).unwrap();

    assert_eq!(series.len(), 12);
    assert!(is_contiguous_daily(&series));
    // 2023-01-06 is interpolated between 103.0 and 104.0
    assert_approx_eq!(series[5].data.closing.unwrap(), 103.5);
}

#[test]
fn differenced_pipeline_keeps_the_reconstruction_identity() {
    let file = fixture_file();
    let config = EvaluatorConfig {
        transform: TransformKind::Differenced,
        ..Default::default()
    };

    let series = DataLoader::load_normalized(file.path(), config.target_field).unwrap();
    let records = run_walk_forward(&series, &config).unwrap();
    let rows = assemble(&series, &records, &config).unwrap();

    assert!(!rows.is_empty());
    for row in &rows {
        let delta = row.forecast_delta.expect("differenced rows carry a delta");
        let previous_day = row.date.pred_opt().unwrap();
        let previous_closing = series
            .iter()
            .find(|bar| bar.date == previous_day)
            .and_then(|bar| bar.data.closing)
            .unwrap();
        assert_eq!(row.predicted, previous_closing + delta);
    }
}

#[test]
fn json_and_csv_exports_agree_on_row_count() {
    let file = fixture_file();

    let rows = run_pipeline(file.path(), &EvaluatorConfig::default()).unwrap();

    let mut json_buffer = Vec::new();
    write_json(&rows, &mut json_buffer).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&json_buffer).unwrap();

    let mut csv_buffer = Vec::new();
    write_csv(&rows, &mut csv_buffer).unwrap();
    let csv_lines = String::from_utf8(csv_buffer).unwrap().lines().count();

    assert_eq!(parsed.as_array().unwrap().len() + 1, csv_lines);
}

#[test]
fn too_short_input_gives_an_empty_result() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,closing").unwrap();
    writeln!(file, "2023-01-01,100.0").unwrap();
    writeln!(file, "2023-01-02,101.0").unwrap();
    writeln!(file, "2023-01-03,102.0").unwrap();

    let rows = run_pipeline(file.path(), &EvaluatorConfig::default()).unwrap();

    assert!(rows.is_empty());
}

#[test]
fn synthetic_series_evaluates_end_to_end() {
    let series = price_series::utils::generate_test_series(40, 100.0, 0.03);
    let config = EvaluatorConfig::default();

    let records = run_walk_forward(&series, &config).unwrap();
    let rows = assemble(&series, &records, &config).unwrap();

    assert!(!rows.is_empty());
    // At most one row per eligible index, final row excluded
    assert!(rows.len() <= 40 - 6 - 1);
}

#[test]
fn missing_target_field_fails_before_forecasting() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,opening").unwrap();
    writeln!(file, "2023-01-01,100.0").unwrap();
    writeln!(file, "2023-01-02,101.0").unwrap();

    let err = run_pipeline(file.path(), &EvaluatorConfig::default()).unwrap_err();

    assert!(matches!(err, ForecastError::MissingField(_)));
}

#[test]
fn alternate_target_field_is_honored() {
    let file = fixture_file();
    let config = EvaluatorConfig {
        target_field: PriceField::Opening,
        ..Default::default()
    };

    let rows = run_pipeline(file.path(), &config).unwrap();

    for row in &rows {
        assert_approx_eq!(row.difference, row.opening.unwrap() - row.predicted, 1e-12);
    }
}
