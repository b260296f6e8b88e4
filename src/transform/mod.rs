//! Transformations from raw observations to model-ready series.
//!
//! # Example
//!
//! ```
//! use anofox_weather::core::{ObservationRecord, Variable};
//! use anofox_weather::transform::SeriesRegularizer;
//! use chrono::{Duration, NaiveDate};
//!
//! let start = NaiveDate::from_ymd_opt(2017, 1, 4).unwrap();
//! let records: Vec<_> = [10.0, f64::NAN, 14.0]
//!     .iter()
//!     .enumerate()
//!     .filter(|(_, v)| v.is_finite())
//!     .map(|(i, &v)| {
//!         let date = start + Duration::weeks(i as i64);
//!         ObservationRecord::new("Sydney", date, Some(v), Some(v), Some(v))
//!     })
//!     .collect();
//!
//! let series = SeriesRegularizer::default().regularize(&records).unwrap();
//! assert_eq!(series.values(Variable::MinTemp), &[10.0, 12.0, 14.0]);
//! ```

pub mod regularize;
pub mod window;

pub use regularize::{interpolate_gaps, week_ending, RegularizerConfig, SeriesRegularizer};
pub use window::rolling_mean;
