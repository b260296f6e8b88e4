//! Seasonal ARIMA, SARIMA(p,d,q)(P,D,Q)\[s\].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{lag_difference, lag_integrate, seasonal_difference};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Bound on every AR and MA coefficient during estimation.
const COEFFICIENT_BOUND: f64 = 0.99;

/// SARIMA model specification.
///
/// Seasonal components only take effect when `s >= 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SARIMASpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
    /// Seasonal AR order (P)
    pub cap_p: usize,
    /// Seasonal differencing order (D)
    pub cap_d: usize,
    /// Seasonal MA order (Q)
    pub cap_q: usize,
    /// Seasonal period (s)
    pub s: usize,
}

impl SARIMASpec {
    /// Create a new SARIMA specification.
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Self {
        Self {
            p,
            d,
            q,
            cap_p,
            cap_d,
            cap_q,
            s,
        }
    }

    /// ARIMA(p,d,q) without seasonal components.
    pub fn non_seasonal(p: usize, d: usize, q: usize) -> Self {
        Self::new(p, d, q, 0, 0, 0, 0)
    }

    /// Whether any seasonal component is active.
    pub fn is_seasonal(&self) -> bool {
        self.s >= 2 && self.cap_p + self.cap_d + self.cap_q > 0
    }

    /// Same orders at a different seasonal period.
    pub fn with_period(mut self, s: usize) -> Self {
        self.s = s;
        self
    }

    /// An intercept is estimated only for undifferenced series.
    pub fn has_intercept(&self) -> bool {
        self.d + self.seasonal_d() == 0
    }

    /// Total number of estimated parameters.
    pub fn num_params(&self) -> usize {
        self.p + self.q + self.seasonal_p() + self.seasonal_q() + usize::from(self.has_intercept())
    }

    /// Shortest series the model can be estimated on.
    ///
    /// Seasonal models need two full periods.
    pub fn min_observations(&self) -> usize {
        let short_run = self.d + self.p.max(self.q) + 2;
        if self.is_seasonal() {
            (2 * self.s).max(short_run + self.s * self.cap_d)
        } else {
            short_run
        }
    }

    /// Reject seasonal components that have no usable period.
    pub fn validate(&self) -> Result<()> {
        if self.s < 2 && self.cap_p + self.cap_d + self.cap_q > 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "{self}: seasonal components need a period of at least 2"
            )));
        }
        Ok(())
    }

    fn seasonal_p(&self) -> usize {
        if self.is_seasonal() {
            self.cap_p
        } else {
            0
        }
    }

    fn seasonal_d(&self) -> usize {
        if self.is_seasonal() {
            self.cap_d
        } else {
            0
        }
    }

    fn seasonal_q(&self) -> usize {
        if self.is_seasonal() {
            self.cap_q
        } else {
            0
        }
    }
}

impl fmt::Display for SARIMASpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_seasonal() {
            write!(
                f,
                "SARIMA({},{},{})({},{},{})[{}]",
                self.p, self.d, self.q, self.cap_p, self.cap_d, self.cap_q, self.s
            )
        } else {
            write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
        }
    }
}

/// Expand `φ(B)Φ(B^s)` into right-hand-side coefficients by lag.
///
/// Index `k - 1` holds the coefficient of `w[t - k]`.
fn expand_ar(phi: &[f64], seasonal_phi: &[f64], s: usize) -> Vec<f64> {
    let mut lags = vec![0.0; phi.len() + s * seasonal_phi.len()];
    for (i, &a) in phi.iter().enumerate() {
        lags[i] += a;
    }
    for (j, &b) in seasonal_phi.iter().enumerate() {
        let seasonal_lag = s * (j + 1);
        lags[seasonal_lag - 1] += b;
        for (i, &a) in phi.iter().enumerate() {
            lags[seasonal_lag + i] -= a * b;
        }
    }
    lags
}

/// Expand `θ(B)Θ(B^s)` into coefficients of lagged residuals.
fn expand_ma(theta: &[f64], seasonal_theta: &[f64], s: usize) -> Vec<f64> {
    let mut lags = vec![0.0; theta.len() + s * seasonal_theta.len()];
    for (i, &a) in theta.iter().enumerate() {
        lags[i] += a;
    }
    for (j, &b) in seasonal_theta.iter().enumerate() {
        let seasonal_lag = s * (j + 1);
        lags[seasonal_lag - 1] += b;
        for (i, &a) in theta.iter().enumerate() {
            lags[seasonal_lag + i] += a * b;
        }
    }
    lags
}

/// One-step prediction at position `t` of `w`.
///
/// Lags before the start of the series are zero deviations.
fn one_step(w: &[f64], residuals: &[f64], t: usize, mean: f64, ar: &[f64], ma: &[f64]) -> f64 {
    let mut pred = mean;
    for (k, &coef) in ar.iter().enumerate().take(t) {
        pred += coef * (w[t - 1 - k] - mean);
    }
    for (k, &coef) in ma.iter().enumerate().take(t) {
        pred += coef * residuals[t - 1 - k];
    }
    pred
}

/// Fitted values and residuals from position `start` onwards.
fn conditional_residuals(
    w: &[f64],
    start: usize,
    mean: f64,
    ar: &[f64],
    ma: &[f64],
) -> (Vec<f64>, Vec<f64>) {
    let n = w.len();
    let mut fitted = vec![f64::NAN; n];
    let mut residuals = vec![0.0; n];
    for t in start..n {
        let pred = one_step(w, &residuals, t, mean, ar, ma);
        fitted[t] = pred;
        residuals[t] = w[t] - pred;
    }
    (fitted, residuals)
}

/// Estimated coefficients, unpacked from the optimizer's parameter vector.
#[derive(Debug, Clone, Default, PartialEq)]
struct Coefficients {
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    seasonal_ar: Vec<f64>,
    seasonal_ma: Vec<f64>,
}

impl Coefficients {
    /// Layout: `[intercept?, φ.., θ.., Φ.., Θ..]`.
    fn unpack(spec: &SARIMASpec, params: &[f64]) -> Self {
        let mut rest = params;
        let mut take = |len: usize| {
            let (head, tail) = rest.split_at(len);
            rest = tail;
            head.to_vec()
        };
        let intercept = if spec.has_intercept() {
            take(1)[0]
        } else {
            0.0
        };
        Self {
            intercept,
            ar: take(spec.p),
            ma: take(spec.q),
            seasonal_ar: take(spec.seasonal_p()),
            seasonal_ma: take(spec.seasonal_q()),
        }
    }

    fn ar_lags(&self, s: usize) -> Vec<f64> {
        expand_ar(&self.ar, &self.seasonal_ar, s)
    }

    fn ma_lags(&self, s: usize) -> Vec<f64> {
        expand_ma(&self.ma, &self.seasonal_ma, s)
    }
}

/// Seasonal ARIMA forecasting model.
///
/// SARIMA(p,d,q)(P,D,Q)\[s\] combines:
/// - seasonal differencing `D` times at lag `s`, then regular differencing `d` times
/// - AR(p) and seasonal AR(P) terms, multiplied out
/// - MA(q) and seasonal MA(Q) terms, multiplied out
///
/// Parameters are estimated by conditional sum of squares.
///
/// # Example
/// ```
/// use anofox_weather::models::arima::SARIMA;
/// use anofox_weather::models::Forecaster;
///
/// // Four years of a period-12 pattern with some noise.
/// let values: Vec<f64> = (0..48)
///     .map(|i| {
///         let i = i as f64;
///         20.0 + 5.0 * (i * std::f64::consts::PI / 6.0).sin() + 0.5 * (i * 1.3).sin()
///     })
///     .collect();
///
/// let mut model = SARIMA::new(1, 0, 1, 1, 1, 0, 12);
/// model.fit(&values).unwrap();
///
/// let forecast = model.predict(12).unwrap();
/// assert_eq!(forecast.len(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct SARIMA {
    spec: SARIMASpec,
    coefficients: Coefficients,
    ar_lags: Vec<f64>,
    ma_lags: Vec<f64>,
    /// Original series (for integration).
    original: Option<Vec<f64>>,
    /// Series after seasonal and regular differencing.
    differenced: Option<Vec<f64>>,
    /// Fitted values on the differenced scale.
    fitted_diff: Option<Vec<f64>>,
    residuals: Option<Vec<f64>>,
    residual_variance: Option<f64>,
    aic: Option<f64>,
    bic: Option<f64>,
    iterations: usize,
    optimizer: NelderMeadConfig,
}

impl SARIMA {
    /// Create a new SARIMA model.
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Self {
        Self::from_spec(SARIMASpec::new(p, d, q, cap_p, cap_d, cap_q, s))
    }

    /// Create a model from a specification.
    pub fn from_spec(spec: SARIMASpec) -> Self {
        Self {
            spec,
            coefficients: Coefficients::default(),
            ar_lags: vec![],
            ma_lags: vec![],
            original: None,
            differenced: None,
            fitted_diff: None,
            residuals: None,
            residual_variance: None,
            aic: None,
            bic: None,
            iterations: 0,
            optimizer: NelderMeadConfig {
                max_iter: 5000,
                tolerance: 1e-8,
                ..Default::default()
            },
        }
    }

    /// Replace the optimizer settings used by [`Forecaster::fit`].
    pub fn with_optimizer(mut self, config: NelderMeadConfig) -> Self {
        self.optimizer = config;
        self
    }

    /// Get the model specification.
    pub fn spec(&self) -> SARIMASpec {
        self.spec
    }

    /// Non-seasonal AR coefficients (φ).
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.coefficients.ar
    }

    /// Non-seasonal MA coefficients (θ).
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.coefficients.ma
    }

    /// Seasonal AR coefficients (Φ).
    pub fn seasonal_ar_coefficients(&self) -> &[f64] {
        &self.coefficients.seasonal_ar
    }

    /// Seasonal MA coefficients (Θ).
    pub fn seasonal_ma_coefficients(&self) -> &[f64] {
        &self.coefficients.seasonal_ma
    }

    /// Mean of the series, zero when any differencing is applied.
    pub fn intercept(&self) -> f64 {
        self.coefficients.intercept
    }

    /// Residual variance.
    pub fn residual_variance(&self) -> Option<f64> {
        self.residual_variance
    }

    /// Get AIC.
    pub fn aic(&self) -> Option<f64> {
        self.aic
    }

    /// Get BIC.
    pub fn bic(&self) -> Option<f64> {
        self.bic
    }

    /// Optimizer iterations used by the last fit.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn period(&self) -> usize {
        if self.spec.is_seasonal() {
            self.spec.s
        } else {
            0
        }
    }

    /// Apply seasonal then regular differencing.
    fn differenced_series(&self, values: &[f64]) -> Vec<f64> {
        let seasonal = lag_difference(values, self.period(), self.spec.seasonal_d());
        lag_difference(&seasonal, 1, self.spec.d)
    }

    fn conditional_start(&self) -> usize {
        self.spec.p.max(self.spec.q)
    }

    /// Minimize the conditional sum of squares over the coefficients.
    fn estimate_parameters(&mut self, w: &[f64]) -> Result<()> {
        let spec = self.spec;
        let s = self.period();
        let start = self.conditional_start();
        let mean = w.iter().sum::<f64>() / w.len() as f64;

        let mut initial = Vec::with_capacity(spec.num_params());
        let mut bounds = Vec::with_capacity(spec.num_params());
        if spec.has_intercept() {
            initial.push(mean);
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        for order in [spec.p, spec.q] {
            for i in 0..order {
                initial.push(0.1 / (i + 1) as f64);
                bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
            }
        }
        for _ in 0..spec.seasonal_p() + spec.seasonal_q() {
            initial.push(0.1);
            bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
        }

        let css = |params: &[f64]| {
            let coefficients = Coefficients::unpack(&spec, params);
            let (_, residuals) = conditional_residuals(
                w,
                start,
                coefficients.intercept,
                &coefficients.ar_lags(s),
                &coefficients.ma_lags(s),
            );
            residuals[start..].iter().map(|e| e * e).sum::<f64>()
        };

        let result = nelder_mead(css, &initial, Some(bounds.as_slice()), &self.optimizer);
        self.iterations = result.iterations;

        if !result.converged {
            return Err(ForecastError::NotConverged {
                iterations: result.iterations,
            });
        }
        if !result.optimal_value.is_finite() || result.optimal_point.iter().any(|x| !x.is_finite())
        {
            return Err(ForecastError::Numerical(format!(
                "{spec}: conditional sum of squares is not finite"
            )));
        }

        self.coefficients = Coefficients::unpack(&spec, &result.optimal_point);
        self.ar_lags = self.coefficients.ar_lags(s);
        self.ma_lags = self.coefficients.ma_lags(s);
        Ok(())
    }

    /// Calculate fitted values, residuals and information criteria.
    fn calculate_fitted(&mut self, w: &[f64]) {
        let start = self.conditional_start();
        let (fitted, residuals) = conditional_residuals(
            w,
            start,
            self.coefficients.intercept,
            &self.ar_lags,
            &self.ma_lags,
        );

        let valid = &residuals[start..];
        if !valid.is_empty() {
            let variance = valid.iter().map(|r| r * r).sum::<f64>() / valid.len() as f64;
            self.residual_variance = Some(variance);

            if variance > 0.0 {
                let n_eff = valid.len() as f64;
                let k = self.spec.num_params() as f64;
                let ll = -0.5 * n_eff * (1.0 + variance.ln() + (2.0 * std::f64::consts::PI).ln());
                self.aic = Some(-2.0 * ll + 2.0 * k);
                self.bic = Some(-2.0 * ll + k * n_eff.ln());
            }
        }

        self.fitted_diff = Some(fitted);
        self.residuals = Some(residuals);
    }
}

impl Forecaster for SARIMA {
    fn fit(&mut self, series: &[f64]) -> Result<()> {
        self.spec.validate()?;

        let min_len = self.spec.min_observations();
        if series.len() < min_len {
            return Err(ForecastError::SeriesTooShort {
                needed: min_len,
                got: series.len(),
            });
        }
        if series.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::Numerical(
                "series contains non-finite values".to_string(),
            ));
        }

        let w = self.differenced_series(series);
        self.estimate_parameters(&w)?;
        self.calculate_fitted(&w);

        self.original = Some(series.to_vec());
        self.differenced = Some(w);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let original = self.original.as_ref().ok_or(ForecastError::FitRequired)?;
        let w = self
            .differenced
            .as_ref()
            .ok_or(ForecastError::FitRequired)?;
        let residuals = self.residuals.as_ref().ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(vec![]);
        }

        let mean = self.coefficients.intercept;
        let mut extended = w.clone();
        let mut extended_residuals = residuals.clone();
        for _ in 0..horizon {
            let t = extended.len();
            let pred = one_step(
                &extended,
                &extended_residuals,
                t,
                mean,
                &self.ar_lags,
                &self.ma_lags,
            );
            extended.push(pred);
            extended_residuals.push(0.0); // Future residuals are 0
        }
        let forecast_diff = &extended[w.len()..];

        // Undo regular differencing against the seasonally differenced history,
        // then seasonal differencing against the original series.
        let period = self.period();
        let seasonal_d = self.spec.seasonal_d();
        let seasonal_history = seasonal_difference(original, seasonal_d, period);
        let regular = lag_integrate(forecast_diff, &seasonal_history, 1, self.spec.d)?;
        lag_integrate(&regular, original, period, seasonal_d)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted_diff.as_deref()
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.residuals.as_deref()
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}
