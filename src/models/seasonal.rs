//! One seasonal model per forecast variable.

use crate::core::{RegularizedSeries, Variable};
use crate::error::{ForecastError, Result};
use crate::models::arima::{SARIMASpec, SARIMA};
use crate::models::Forecaster;

/// Weekly seasonal period: one year.
pub const WEEKS_PER_YEAR: usize = 52;

/// Default SARIMA orders for each variable.
///
/// | variable | (p,d,q) | (P,D,Q,s)  |
/// |----------|---------|------------|
/// | min_temp | (1,0,1) | (1,1,0,52) |
/// | max_temp | (1,0,1) | (1,1,1,52) |
/// | rainfall | (0,0,0) | (1,1,1,52) |
pub fn default_spec(variable: Variable) -> SARIMASpec {
    match variable {
        Variable::MinTemp => SARIMASpec::new(1, 0, 1, 1, 1, 0, WEEKS_PER_YEAR),
        Variable::MaxTemp => SARIMASpec::new(1, 0, 1, 1, 1, 1, WEEKS_PER_YEAR),
        Variable::Rainfall => SARIMASpec::new(0, 0, 0, 1, 1, 1, WEEKS_PER_YEAR),
    }
}

/// Seasonal model configuration for a single variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalForecastModel {
    variable: Variable,
    spec: SARIMASpec,
}

impl SeasonalForecastModel {
    pub fn new(variable: Variable, spec: SARIMASpec) -> Self {
        Self { variable, spec }
    }

    /// Model with the default orders for `variable`.
    pub fn for_variable(variable: Variable) -> Self {
        Self::new(variable, default_spec(variable))
    }

    pub fn variable(&self) -> Variable {
        self.variable
    }

    pub fn spec(&self) -> SARIMASpec {
        self.spec
    }

    /// Fit this variable's column of `series`.
    ///
    /// Every failure is reported as [`ForecastError::ModelFit`] naming the
    /// variable.
    pub fn fit(&self, series: &RegularizedSeries) -> Result<FittedModel> {
        self.fit_values(series.values(self.variable))
    }

    /// Fit a bare weekly column.
    pub fn fit_values(&self, values: &[f64]) -> Result<FittedModel> {
        let mut model = SARIMA::from_spec(self.spec);
        if let Err(err) = model.fit(values) {
            tracing::warn!(
                variable = %self.variable,
                spec = %self.spec,
                error = %err,
                "model fit failed"
            );
            return Err(ForecastError::model_fit(self.variable, err));
        }

        tracing::debug!(
            variable = %self.variable,
            spec = %self.spec,
            ar = ?model.ar_coefficients(),
            ma = ?model.ma_coefficients(),
            seasonal_ar = ?model.seasonal_ar_coefficients(),
            seasonal_ma = ?model.seasonal_ma_coefficients(),
            aic = ?model.aic(),
            iterations = model.iterations(),
            "model fitted"
        );

        Ok(FittedModel {
            variable: self.variable,
            model,
        })
    }
}

/// A model fitted to one variable's weekly history.
#[derive(Debug, Clone)]
pub struct FittedModel {
    variable: Variable,
    model: SARIMA,
}

impl FittedModel {
    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// Point forecasts for the next `horizon` weeks.
    pub fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        self.model
            .predict(horizon)
            .map_err(|err| ForecastError::model_fit(self.variable, err))
    }
}
