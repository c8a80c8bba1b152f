use forecast_eval::models::{fit_and_forecast_one_step, Arima};
use forecast_eval::{ForecastError, ForecastModel, TrainedForecastModel};
use rstest::rstest;

fn wiggly_series() -> Vec<f64> {
    vec![100.0, 101.0, 99.0, 102.0, 103.0, 105.0, 104.0, 106.0, 108.0, 107.0]
}

#[rstest]
#[case(1, 1, 1)]
#[case(1, 0, 1)]
#[case(2, 0, 0)]
#[case(2, 1, 0)]
fn forecasts_are_finite_for_small_orders(#[case] p: usize, #[case] d: usize, #[case] q: usize) {
    let values = wiggly_series();

    let forecast = fit_and_forecast_one_step(&values, (p, d, q)).unwrap();

    assert!(forecast.is_finite());
    // One step ahead of a series living near 100 should stay near 100
    assert!(forecast > 50.0 && forecast < 150.0);
}

#[test]
fn trained_model_reports_its_name() {
    let model = Arima::new(1, 1, 1).unwrap();
    let trained = model.fit(&wiggly_series()).unwrap();

    assert_eq!(model.name(), "ARIMA(1,1,1)");
    assert_eq!(trained.name(), "ARIMA(1,1,1)");
}

#[test]
fn forecast_result_has_requested_horizons() {
    let trained = Arima::new(1, 0, 1).unwrap().fit(&wiggly_series()).unwrap();

    let forecast = trained.forecast(4).unwrap();

    assert_eq!(forecast.horizons(), 4);
    assert_eq!(forecast.values().len(), 4);
    assert!(forecast.values().iter().all(|value| value.is_finite()));
}

#[test]
fn zero_horizon_is_rejected() {
    let trained = Arima::new(1, 0, 1).unwrap().fit(&wiggly_series()).unwrap();

    assert!(matches!(
        trained.forecast(0),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn insufficient_variation_is_a_model_fit_error() {
    let flat = vec![42.0; 20];

    let err = fit_and_forecast_one_step(&flat, (1, 0, 1)).unwrap_err();

    assert!(matches!(err, ForecastError::ModelFit(_)));
}

#[test]
fn insufficient_data_is_a_model_fit_error() {
    let short = vec![1.0, 2.0];

    let err = fit_and_forecast_one_step(&short, (1, 1, 1)).unwrap_err();

    assert!(matches!(err, ForecastError::ModelFit(_)));
}

#[test]
fn identical_input_gives_identical_forecasts() {
    let values = wiggly_series();

    let first = fit_and_forecast_one_step(&values, (1, 0, 1)).unwrap();
    let second = fit_and_forecast_one_step(&values, (1, 0, 1)).unwrap();

    assert_eq!(first.to_bits(), second.to_bits());
}
