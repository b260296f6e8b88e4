//! Serialized result of a forecast request.

use serde::Serialize;

use crate::core::ForecastTable;
use crate::error::{ErrorCategory, ForecastError, Result};

/// Structured failure returned in place of a forecast table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    /// Short reason, e.g. `"Location not found"`.
    pub error: String,
    pub kind: ErrorCategory,
    /// Full error message.
    pub detail: String,
}

impl From<&ForecastError> for ErrorResponse {
    fn from(err: &ForecastError) -> Self {
        let kind = err.category();
        let reason = match kind {
            ErrorCategory::LocationNotFound => "Location not found",
            ErrorCategory::InsufficientData => "Insufficient data",
            ErrorCategory::ModelFit => "Model fit failed",
            ErrorCategory::Input => "Invalid input",
        };
        Self {
            error: reason.to_string(),
            kind,
            detail: err.to_string(),
        }
    }
}

/// Either a forecast table or an error object.
///
/// Serializes untagged: a JSON array on success, an object on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForecastResponse {
    Success(ForecastTable),
    Failure(ErrorResponse),
}

impl ForecastResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ForecastResponse::Success(_))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ForecastError::Parse(format!("serialize response: {err}")))
    }
}

impl From<Result<ForecastTable>> for ForecastResponse {
    fn from(result: Result<ForecastTable>) -> Self {
        match result {
            Ok(table) => ForecastResponse::Success(table),
            Err(err) => ForecastResponse::Failure(ErrorResponse::from(&err)),
        }
    }
}
