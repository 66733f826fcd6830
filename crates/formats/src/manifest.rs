use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: &str = "1.0";

/// Manifest of a loadable dataset package: the observation table, the
/// boundary geometry, and optionally a custom indicator catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageManifest {
    pub version: String,
    pub package_id: String,
    pub name: Option<String>,
    pub parts: Vec<PartEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Observations,
    Boundaries,
    Indicators,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartEntry {
    pub kind: PartKind,
    pub path: String,
    /// blake3 hex digest of the part payload. Absent hashes skip
    /// verification (hand-written demo packages); the packer tool always
    /// stamps them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl PackageManifest {
    pub fn new(package_id: impl Into<String>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            package_id: package_id.into(),
            name: None,
            parts: Vec::new(),
        }
    }

    pub fn part(&self, kind: PartKind) -> Option<&PartEntry> {
        self.parts.iter().find(|p| p.kind == kind)
    }
}
