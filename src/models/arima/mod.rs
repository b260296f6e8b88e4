//! Seasonal ARIMA models.
//!
//! This module provides:
//! - SARIMA(p,d,q)(P,D,Q)\[s\] estimated by conditional sum of squares
//! - Differencing and integration at regular and seasonal lags

mod diff;
mod model;

pub use diff::{
    difference, integrate, lag_difference, lag_integrate, seasonal_difference,
    seasonal_integrate,
};
pub use model::{SARIMASpec, SARIMA};
