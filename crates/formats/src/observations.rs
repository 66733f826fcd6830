use serde_json::Value;

use model::Observation;

/// Parsed observation table: one record per country/indicator/year triple.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObservationTable {
    pub rows: Vec<Observation>,
}

#[derive(Debug)]
pub enum ObservationError {
    NotAnArray,
    InvalidRecord { index: usize, reason: String },
}

impl std::fmt::Display for ObservationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObservationError::NotAnArray => {
                write!(f, "expected a JSON array of observation records")
            }
            ObservationError::InvalidRecord { index, reason } => {
                write!(f, "invalid record at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for ObservationError {}

impl ObservationTable {
    pub fn from_json_str(payload: &str) -> Result<Self, ObservationError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| ObservationError::InvalidRecord {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_json_value(value)
    }

    /// Records use the loader's field names: `CountryCode`, `IndicatorName`,
    /// `Year`, `Value`.
    pub fn from_json_value(value: Value) -> Result<Self, ObservationError> {
        let records = value.as_array().ok_or(ObservationError::NotAnArray)?;

        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let obj = record.as_object().ok_or(ObservationError::InvalidRecord {
                index,
                reason: "record must be an object".to_string(),
            })?;

            let country_code = obj
                .get("CountryCode")
                .and_then(|v| v.as_str())
                .ok_or(ObservationError::InvalidRecord {
                    index,
                    reason: "missing CountryCode".to_string(),
                })?;
            let indicator = obj
                .get("IndicatorName")
                .and_then(|v| v.as_str())
                .ok_or(ObservationError::InvalidRecord {
                    index,
                    reason: "missing IndicatorName".to_string(),
                })?;
            let year = obj
                .get("Year")
                .and_then(|v| v.as_i64())
                .ok_or(ObservationError::InvalidRecord {
                    index,
                    reason: "Year must be an integer".to_string(),
                })?;
            let value = obj
                .get("Value")
                .and_then(|v| v.as_f64())
                .ok_or(ObservationError::InvalidRecord {
                    index,
                    reason: "Value must be a number".to_string(),
                })?;

            rows.push(Observation::new(country_code, indicator, year as i32, value));
        }

        Ok(Self { rows })
    }
}
