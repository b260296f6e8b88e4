//! Forecast configuration, loadable from TOML.
//!
//! ```toml
//! horizon = 26
//!
//! [regularizer]
//! min_weeks = 2
//! max_hole_fraction = 0.5
//!
//! [models.rainfall]
//! p = 0
//! d = 0
//! q = 0
//! cap_p = 1
//! cap_d = 1
//! cap_q = 1
//! s = 52
//! ```
//!
//! Every section is optional; omitted values take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Variable;
use crate::error::{ForecastError, Result};
use crate::models::arima::SARIMASpec;
use crate::models::default_spec;
use crate::transform::RegularizerConfig;

/// Number of weeks forecast per request.
pub const DEFAULT_HORIZON: usize = 26;

/// Longest accepted horizon, in weeks (about a century).
pub const MAX_HORIZON: usize = 5200;

/// Per-variable model orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableModels {
    pub min_temp: SARIMASpec,
    pub max_temp: SARIMASpec,
    pub rainfall: SARIMASpec,
}

impl Default for VariableModels {
    fn default() -> Self {
        Self {
            min_temp: default_spec(Variable::MinTemp),
            max_temp: default_spec(Variable::MaxTemp),
            rainfall: default_spec(Variable::Rainfall),
        }
    }
}

impl VariableModels {
    pub fn get(&self, variable: Variable) -> SARIMASpec {
        match variable {
            Variable::MinTemp => self.min_temp,
            Variable::MaxTemp => self.max_temp,
            Variable::Rainfall => self.rainfall,
        }
    }

    fn get_mut(&mut self, variable: Variable) -> &mut SARIMASpec {
        match variable {
            Variable::MinTemp => &mut self.min_temp,
            Variable::MaxTemp => &mut self.max_temp,
            Variable::Rainfall => &mut self.rainfall,
        }
    }
}

/// Settings for a forecast request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Weeks to forecast.
    pub horizon: usize,
    pub regularizer: RegularizerConfig,
    pub models: VariableModels,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            regularizer: RegularizerConfig::default(),
            models: VariableModels::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| ForecastError::Io(format!("{}: {err}", path.display())))?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), ?config, "loaded forecast config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be positive".to_string(),
            ));
        }
        if self.horizon > MAX_HORIZON {
            return Err(ForecastError::InvalidParameter(format!(
                "horizon {} exceeds the maximum of {MAX_HORIZON} weeks",
                self.horizon
            )));
        }
        self.regularizer.validate()?;
        for variable in Variable::ALL {
            self.models.get(variable).validate().map_err(|err| match err {
                ForecastError::InvalidParameter(msg) => {
                    ForecastError::InvalidParameter(format!("models.{variable}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Use seasonal period `s` for every variable.
    pub fn with_seasonal_period(mut self, s: usize) -> Self {
        for variable in Variable::ALL {
            let spec = self.models.get_mut(variable);
            *spec = spec.with_period(s);
        }
        self
    }

    /// Replace the model orders of one variable.
    pub fn with_model(mut self, variable: Variable, spec: SARIMASpec) -> Self {
        *self.models.get_mut(variable) = spec;
        self
    }

    pub fn with_regularizer(mut self, regularizer: RegularizerConfig) -> Self {
        self.regularizer = regularizer;
        self
    }

    pub fn spec_for(&self, variable: Variable) -> SARIMASpec {
        self.models.get(variable)
    }
}
