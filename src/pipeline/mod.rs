//! Request-level forecasting: regularize, fit per variable, assemble a table.

mod orchestrator;
mod response;

pub use orchestrator::ForecastOrchestrator;
pub use response::{ErrorResponse, ForecastResponse};
