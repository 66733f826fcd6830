use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The pseudo-region covering every country in the directory.
pub const WORLD_REGION: &str = "World";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub alpha3: String,
    /// ISO 3166-1 numeric code; also the id carried by boundary geometry.
    pub code: u32,
    pub region: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryData {
    pub regions: Vec<String>,
    pub countries: Vec<CountryRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    pub alpha_3: String,
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    Parse(String),
    DuplicateCode(u32),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::Parse(msg) => write!(f, "country table parse error: {msg}"),
            DirectoryError::DuplicateCode(code) => {
                write!(f, "duplicate numeric country code: {code}")
            }
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Static bidirectional mapping between country display names, numeric codes,
/// alpha-3 codes, and region membership.
///
/// Lookups are case-insensitive over canonical names and known aliases.
/// Unknown names resolve to `None` or are skipped; the directory never
/// panics on bad input.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    records: Vec<CountryRecord>,
    regions: Vec<String>,
    by_key: BTreeMap<String, usize>,
    by_code: BTreeMap<u32, usize>,
}

impl Directory {
    pub fn from_data(data: DirectoryData) -> Result<Self, DirectoryError> {
        let mut by_key = BTreeMap::new();
        let mut by_code = BTreeMap::new();

        for (idx, record) in data.countries.iter().enumerate() {
            if by_code.insert(record.code, idx).is_some() {
                return Err(DirectoryError::DuplicateCode(record.code));
            }
            by_key.insert(lookup_key(&record.name), idx);
            by_key.insert(lookup_key(&record.alpha3), idx);
            for alias in &record.aliases {
                by_key.insert(lookup_key(alias), idx);
            }
        }

        Ok(Self {
            records: data.countries,
            regions: data.regions,
            by_key,
            by_code,
        })
    }

    pub fn from_json_str(payload: &str) -> Result<Self, DirectoryError> {
        let data: DirectoryData =
            serde_json::from_str(payload).map_err(|e| DirectoryError::Parse(e.to_string()))?;
        Self::from_data(data)
    }

    /// The built-in table shipped with the dashboard.
    pub fn embedded() -> &'static Directory {
        static EMBEDDED: Lazy<Directory> = Lazy::new(|| {
            Directory::from_json_str(include_str!("../assets/countries.json"))
                .expect("embedded country table is well-formed")
        });
        &EMBEDDED
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<&CountryRecord> {
        let idx = *self.by_key.get(&lookup_key(name))?;
        self.records.get(idx)
    }

    pub fn num_code(&self, name: &str) -> Option<u32> {
        self.lookup(name).map(|r| r.code)
    }

    /// Alpha-3 codes for the given names; unknown names are dropped.
    pub fn alpha3s<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .filter_map(|n| self.lookup(n.as_ref()))
            .map(|r| r.alpha3.clone())
            .collect()
    }

    /// Numeric codes for the given names; unknown names are dropped.
    pub fn num_codes<S: AsRef<str>>(&self, names: &[S]) -> Vec<u32> {
        names
            .iter()
            .filter_map(|n| self.num_code(n.as_ref()))
            .collect()
    }

    pub fn alpha3_of(&self, code: u32) -> Option<&str> {
        let idx = *self.by_code.get(&code)?;
        self.records.get(idx).map(|r| r.alpha3.as_str())
    }

    pub fn info(&self, code: u32) -> Option<CountryInfo> {
        let idx = *self.by_code.get(&code)?;
        self.records.get(idx).map(|r| CountryInfo {
            alpha_3: r.alpha3.clone(),
            country_name: r.name.clone(),
        })
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn is_region(&self, name: &str) -> bool {
        self.canonical_region(name).is_some()
    }

    fn canonical_region(&self, name: &str) -> Option<&str> {
        let key = lookup_key(name);
        self.regions
            .iter()
            .find(|r| lookup_key(r) == key)
            .map(|r| r.as_str())
    }

    /// Display names of every country in `region`, in table order.
    ///
    /// [`WORLD_REGION`] yields the full table; an unknown region yields
    /// nothing.
    pub fn countries_of_region(&self, region: &str) -> Vec<&str> {
        let Some(canonical) = self.canonical_region(region) else {
            return Vec::new();
        };
        self.records
            .iter()
            .filter(|r| canonical == WORLD_REGION || r.region == canonical)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// True when both names refer to the same country under alias
    /// equivalence ("Russia" vs "Russian Federation").
    pub fn is_same_country_name(&self, a: &str, b: &str) -> bool {
        match (self.lookup(a), self.lookup(b)) {
            (Some(ra), Some(rb)) => ra.code == rb.code,
            _ => lookup_key(a) == lookup_key(b),
        }
    }

    /// Canonicalizes a user-supplied area name: whitespace is collapsed, and
    /// a name the directory knows (country, alias, or region, any casing) is
    /// replaced by its canonical spelling.
    pub fn sanitize_name(&self, raw: &str) -> String {
        let collapsed = collapse_whitespace(raw);
        if let Some(record) = self.lookup(&collapsed) {
            return record.name.clone();
        }
        if let Some(region) = self.canonical_region(&collapsed) {
            return region.to_string();
        }
        collapsed
    }
}

fn lookup_key(name: &str) -> String {
    collapse_whitespace(name).to_lowercase()
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::{Directory, WORLD_REGION};
    use pretty_assertions::assert_eq;

    #[test]
    fn embedded_table_loads_and_indexes() {
        let dir = Directory::embedded();
        assert!(dir.len() > 50);
        assert_eq!(dir.num_code("United States"), Some(840));
        assert_eq!(dir.alpha3_of(840), Some("USA"));

        let info = dir.info(404).unwrap();
        assert_eq!(info.alpha_3, "KEN");
        assert_eq!(info.country_name, "Kenya");
    }

    #[test]
    fn lookups_accept_aliases_and_casing() {
        let dir = Directory::embedded();
        assert_eq!(dir.num_code("russian federation"), Some(643));
        assert_eq!(dir.num_code("RUSSIA"), Some(643));
        assert_eq!(dir.num_code("Korea, Rep."), Some(410));
        assert_eq!(dir.num_code("Atlantis"), None);
    }

    #[test]
    fn batch_lookups_drop_unknown_names() {
        let dir = Directory::embedded();
        let names = ["Brazil", "Atlantis", "Japan"];
        assert_eq!(dir.alpha3s(&names), vec!["BRA", "JPN"]);
        assert_eq!(dir.num_codes(&names), vec![76, 392]);
    }

    #[test]
    fn world_region_covers_every_country() {
        let dir = Directory::embedded();
        assert_eq!(dir.countries_of_region(WORLD_REGION).len(), dir.len());
        assert!(dir.countries_of_region("South Asia").contains(&"India"));
        assert!(dir.countries_of_region("Narnia").is_empty());
    }

    #[test]
    fn same_country_name_handles_alternate_spellings() {
        let dir = Directory::embedded();
        assert!(dir.is_same_country_name("Russia", "Russian Federation"));
        assert!(dir.is_same_country_name("south korea", "Korea, Rep."));
        assert!(!dir.is_same_country_name("Russia", "Ukraine"));
        // Names outside the table still compare by canonical key.
        assert!(dir.is_same_country_name("Gondor ", "gondor"));
    }

    #[test]
    fn sanitize_collapses_whitespace_and_canonicalizes() {
        let dir = Directory::embedded();
        assert_eq!(dir.sanitize_name("  viet   nam "), "Vietnam");
        assert_eq!(dir.sanitize_name("sub-saharan  africa"), "Sub-Saharan Africa");
        assert_eq!(dir.sanitize_name(" Mordor  East "), "Mordor East");
    }
}
