/// One raw data point: a country, an indicator, a year, a value.
///
/// Country codes are alpha-3; indicator codes come from the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country_code: String,
    pub indicator: String,
    pub year: i32,
    pub value: f64,
}

impl Observation {
    pub fn new(
        country_code: impl Into<String>,
        indicator: impl Into<String>,
        year: i32,
        value: f64,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            indicator: indicator.into(),
            year,
            value,
        }
    }
}
