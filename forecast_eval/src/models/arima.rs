//! ARIMA model for time series forecasting

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};

/// Variance below this counts as no usable variation in the series
const MIN_VARIANCE: f64 = 1e-12;
/// Pivot magnitude below this makes the normal equations singular
const MIN_PIVOT: f64 = 1e-10;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct Arima {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
}

/// Fitted ARIMA model ready to forecast
#[derive(Debug, Clone)]
pub struct TrainedArima {
    /// Name of the model
    name: String,
    /// Fitted intercept
    intercept: f64,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Training series after differencing
    working: Vec<f64>,
    /// Fit residuals, aligned with `working`
    residuals: Vec<f64>,
    /// Last value of each differencing level, outermost first
    level_tails: Vec<f64>,
}

impl Arima {
    /// Create a new ARIMA model with the given order
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p == 0 && q == 0 {
            return Err(ForecastError::InvalidParameter(
                "ARIMA needs at least one AR or MA term".to_string(),
            ));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
        })
    }

    /// The (p, d, q) order of the model
    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }
}

impl ForecastModel for Arima {
    type Trained = TrainedArima;

    fn fit(&self, values: &[f64]) -> Result<TrainedArima> {
        let minimum = self.p + self.d + self.q + 2;
        if values.len() < minimum {
            return Err(ForecastError::ModelFit(format!(
                "Insufficient data for {}. Need at least {} observations, got {}.",
                self.name,
                minimum,
                values.len()
            )));
        }

        // Capture the last value of each level before differencing it away;
        // the forecast integrates back through these tails.
        let mut level_tails = Vec::with_capacity(self.d);
        let mut working = values.to_vec();
        for _ in 0..self.d {
            level_tails.push(working[working.len() - 1]);
            working = difference(&working);
        }

        if variance(&working) < MIN_VARIANCE {
            return Err(ForecastError::ModelFit(format!(
                "Insufficient variation in the input for {}",
                self.name
            )));
        }

        let (intercept, ar_coefficients) = fit_ar(&working, self.p)?;

        // Innovations of the AR stage
        let mut residuals = vec![0.0; working.len()];
        for t in self.p..working.len() {
            let mut predicted = intercept;
            for (lag, phi) in ar_coefficients.iter().enumerate() {
                predicted += phi * working[t - 1 - lag];
            }
            residuals[t] = working[t] - predicted;
        }

        let ma_coefficients = fit_ma(&residuals[self.p..], self.q);

        Ok(TrainedArima {
            name: self.name.clone(),
            intercept,
            ar_coefficients,
            ma_coefficients,
            working,
            residuals,
            level_tails,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedArima {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        if horizons == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let mut working = self.working.clone();
        let mut residuals = self.residuals.clone();
        let mut differenced = Vec::with_capacity(horizons);

        for _ in 0..horizons {
            let mut next = self.intercept;
            for (lag, phi) in self.ar_coefficients.iter().enumerate() {
                next += phi * working[working.len() - 1 - lag];
            }
            for (lag, theta) in self.ma_coefficients.iter().enumerate() {
                next += theta * residuals[residuals.len() - 1 - lag];
            }

            working.push(next);
            // Future innovations are unknown
            residuals.push(0.0);
            differenced.push(next);
        }

        // Integrate each forecast back to the original scale
        let mut tails = self.level_tails.clone();
        let mut forecasts = Vec::with_capacity(horizons);
        for &delta in &differenced {
            let mut value = delta;
            for level in (0..tails.len()).rev() {
                value += tails[level];
                tails[level] = value;
            }
            forecasts.push(value);
        }

        if forecasts.iter().any(|value| !value.is_finite()) {
            return Err(ForecastError::ModelFit(format!(
                "Non-finite forecast from {}",
                self.name
            )));
        }

        ForecastResult::new(forecasts, horizons)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fit the model to a sequence and return its one-step-ahead point forecast.
///
/// This is the narrow entry the walk-forward evaluator calls per window; the
/// sequence must carry at least two effective observations.
pub fn fit_and_forecast_one_step(values: &[f64], order: (usize, usize, usize)) -> Result<f64> {
    let (p, d, q) = order;
    let model = Arima::new(p, d, q)?;
    let trained = model.fit(values)?;
    trained.forecast(1)?.one_step()
}

/// First difference of a series
fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Population variance
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Least-squares fit of an AR(p) process with intercept.
///
/// Returns (intercept, coefficients). With `p == 0` the fit degenerates to
/// the series mean.
fn fit_ar(working: &[f64], p: usize) -> Result<(f64, Vec<f64>)> {
    let n = working.len();
    let unknowns = p + 1;
    if n.saturating_sub(p) < unknowns {
        return Err(ForecastError::ModelFit(format!(
            "Insufficient data to estimate AR({}) coefficients",
            p
        )));
    }

    let mut xtx = vec![vec![0.0; unknowns]; unknowns];
    let mut xty = vec![0.0; unknowns];
    let mut row = vec![0.0; unknowns];
    for t in p..n {
        row[0] = 1.0;
        for lag in 1..=p {
            row[lag] = working[t - lag];
        }
        for a in 0..unknowns {
            xty[a] += row[a] * working[t];
            for b in 0..unknowns {
                xtx[a][b] += row[a] * row[b];
            }
        }
    }

    let beta = solve(xtx, xty).ok_or_else(|| {
        ForecastError::ModelFit(format!("AR({}) normal equations are singular", p))
    })?;

    Ok((beta[0], beta[1..].to_vec()))
}

/// Least-squares fit of MA(q) coefficients from fit residuals.
///
/// A singular system means the AR stage already explains the series; the MA
/// correction is then zero rather than an error.
fn fit_ma(residuals: &[f64], q: usize) -> Vec<f64> {
    if q == 0 {
        return Vec::new();
    }
    let n = residuals.len();
    if n.saturating_sub(q) < q {
        return vec![0.0; q];
    }

    let mut xtx = vec![vec![0.0; q]; q];
    let mut xty = vec![0.0; q];
    for t in q..n {
        for a in 0..q {
            xty[a] += residuals[t - 1 - a] * residuals[t];
            for b in 0..q {
                xtx[a][b] += residuals[t - 1 - a] * residuals[t - 1 - b];
            }
        }
    }

    solve(xtx, xty).unwrap_or_else(|| vec![0.0; q])
}

/// Solve a linear system by Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < MIN_PIVOT {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in row + 1..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }

    Some(x)
}
