//! Forecast table returned to callers.

use crate::core::observation::Variable;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Forecast for one future week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "MinTemp_Forecast")]
    pub min_temp: f64,
    #[serde(rename = "MaxTemp_Forecast")]
    pub max_temp: f64,
    #[serde(rename = "Rainfall_Forecast")]
    pub rainfall: f64,
}

impl ForecastPoint {
    /// Forecast value for `variable`.
    pub fn value(&self, variable: Variable) -> f64 {
        match variable {
            Variable::MinTemp => self.min_temp,
            Variable::MaxTemp => self.max_temp,
            Variable::Rainfall => self.rainfall,
        }
    }
}

/// Ordered weekly forecasts for all three variables.
///
/// Serializes as a JSON array of [`ForecastPoint`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastTable {
    points: Vec<ForecastPoint>,
}

impl ForecastTable {
    /// Zip dates with the three per-variable forecasts.
    ///
    /// All columns must have the same length as `dates`.
    pub fn from_columns(
        dates: &[NaiveDate],
        min_temp: &[f64],
        max_temp: &[f64],
        rainfall: &[f64],
    ) -> Result<Self> {
        for (variable, column) in [
            (Variable::MinTemp, min_temp),
            (Variable::MaxTemp, max_temp),
            (Variable::Rainfall, rainfall),
        ] {
            if column.len() != dates.len() {
                return Err(ForecastError::InvalidParameter(format!(
                    "{variable} forecast has {} values for {} dates",
                    column.len(),
                    dates.len()
                )));
            }
        }

        let points = dates
            .iter()
            .enumerate()
            .map(|(i, &date)| ForecastPoint {
                date,
                min_temp: min_temp[i],
                max_temp: max_temp[i],
                rainfall: rainfall[i],
            })
            .collect();

        Ok(Self { points })
    }

    /// Get the forecast horizon (number of weeks).
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&ForecastPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// All forecasts of one variable, in date order.
    pub fn column(&self, variable: Variable) -> Vec<f64> {
        self.points.iter().map(|p| p.value(variable)).collect()
    }

    /// Serialize to the JSON array handed to the gateway.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ForecastError::Parse(format!("failed to serialize forecast: {e}")))
    }
}

impl<'a> IntoIterator for &'a ForecastTable {
    type Item = &'a ForecastPoint;
    type IntoIter = std::slice::Iter<'a, ForecastPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates() -> Vec<NaiveDate> {
        vec![
            NaiveDate::from_ymd_opt(2017, 7, 2).unwrap(),
            NaiveDate::from_ymd_opt(2017, 7, 9).unwrap(),
        ]
    }

    #[test]
    fn zips_columns_in_order() {
        let table =
            ForecastTable::from_columns(&dates(), &[8.0, 7.5], &[18.0, 17.0], &[2.5, 0.0])
                .unwrap();
        assert_eq!(table.horizon(), 2);
        assert_eq!(table.column(Variable::MaxTemp), vec![18.0, 17.0]);
        assert_eq!(table.first().unwrap().date, dates()[0]);
        assert_eq!(table.last().unwrap().value(Variable::Rainfall), 0.0);
        assert_eq!(table.dates(), dates());
    }

    #[test]
    fn rejects_misaligned_columns() {
        let result = ForecastTable::from_columns(&dates(), &[8.0], &[18.0, 17.0], &[2.5, 0.0]);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }

    #[test]
    fn serializes_with_gateway_field_names() {
        let table =
            ForecastTable::from_columns(&dates()[..1], &[8.25], &[18.5], &[2.0]).unwrap();
        let json = table.to_json().unwrap();
        assert_eq!(
            json,
            concat!(
                r#"[{"Date":"2017-07-02","MinTemp_Forecast":8.25,"#,
                r#""MaxTemp_Forecast":18.5,"Rainfall_Forecast":2.0}]"#
            )
        );

        let back: ForecastTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn empty_table() {
        let table = ForecastTable::default();
        assert!(table.is_empty());
        assert_eq!(table.horizon(), 0);
        assert_eq!(table.to_json().unwrap(), "[]");
    }
}
