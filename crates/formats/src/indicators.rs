use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub code: String,
    pub name: String,
}

/// Fixed catalogue of selectable indicators. The first entry is the
/// default the dashboard starts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorCatalogue {
    pub entries: Vec<IndicatorEntry>,
}

impl IndicatorCatalogue {
    /// The catalogue shipped with the dashboard.
    pub fn built_in() -> Self {
        let entries = [
            ("SP.POP.TOTL", "Population, total"),
            ("NY.GDP.MKTP.CD", "GDP (current US$)"),
            ("NY.GDP.PCAP.CD", "GDP per capita (current US$)"),
            ("SP.DYN.LE00.IN", "Life expectancy at birth (years)"),
            ("EN.ATM.CO2E.PC", "CO2 emissions (metric tons per capita)"),
            ("SL.UEM.TOTL.ZS", "Unemployment (% of labor force)"),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(code, name)| IndicatorEntry {
                    code: code.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn default_entry(&self) -> Option<&IndicatorEntry> {
        self.entries.first()
    }

    pub fn find(&self, code: &str) -> Option<&IndicatorEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    /// Display name for a code; falls back to the code itself so an unknown
    /// indicator still renders a legend title.
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.find(code).map(|e| e.name.as_str()).unwrap_or(code)
    }
}
