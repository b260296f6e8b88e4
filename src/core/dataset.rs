//! Historical observation table loaded from the `weatherAUS` CSV layout.

use crate::core::observation::{parse_observation_date, ObservationRecord};
use crate::error::{ForecastError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One CSV row as it appears on disk.
///
/// Numeric cells that do not parse (`NA`, blanks) become `None`; absent
/// columns are treated the same way.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "MinTemp", default, deserialize_with = "csv::invalid_option")]
    min_temp: Option<f64>,
    #[serde(rename = "MaxTemp", default, deserialize_with = "csv::invalid_option")]
    max_temp: Option<f64>,
    #[serde(rename = "Rainfall", default, deserialize_with = "csv::invalid_option")]
    rainfall: Option<f64>,
    #[serde(rename = "Temp3pm", default, deserialize_with = "csv::invalid_option")]
    temp_3pm: Option<f64>,
    #[serde(rename = "Humidity9am", default, deserialize_with = "csv::invalid_option")]
    humidity_9am: Option<f64>,
    #[serde(rename = "Humidity3pm", default, deserialize_with = "csv::invalid_option")]
    humidity_3pm: Option<f64>,
}

/// Read-only collection of daily observations across all locations.
#[derive(Debug, Clone, Default)]
pub struct WeatherDataset {
    records: Vec<ObservationRecord>,
}

impl WeatherDataset {
    /// Wrap already-parsed records.
    pub fn from_records(records: Vec<ObservationRecord>) -> Self {
        Self { records }
    }

    /// Load a dataset from a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ForecastError::Io(format!("{}: {e}", path.display())))?;
        let dataset = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            records = dataset.len(),
            "loaded weather dataset"
        );
        Ok(dataset)
    }

    /// Load a dataset from any CSV source with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let row = row?;
            let date = parse_observation_date(&row.date)
                .map_err(|e| ForecastError::Parse(format!("line {line}: {e}")))?;

            records.push(ObservationRecord {
                location: row.location,
                date,
                min_temp: row.min_temp,
                max_temp: row.max_temp,
                rainfall: row.rainfall,
                temp_3pm: row.temp_3pm,
                humidity_9am: row.humidity_9am,
                humidity_3pm: row.humidity_3pm,
            });
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    /// Distinct location names, sorted.
    pub fn locations(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.location.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Copy out every record whose location contains `query`, ignoring case.
    ///
    /// Returns [`ForecastError::LocationNotFound`] when nothing matches.
    pub fn filter_location(&self, query: &str) -> Result<Vec<ObservationRecord>> {
        if query.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "location must not be empty".to_string(),
            ));
        }

        let matching: Vec<ObservationRecord> = self
            .records
            .iter()
            .filter(|r| r.matches_location(query))
            .cloned()
            .collect();

        if matching.is_empty() {
            return Err(ForecastError::LocationNotFound(query.trim().to_string()));
        }
        Ok(matching)
    }
}
