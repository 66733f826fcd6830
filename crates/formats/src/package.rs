use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use model::BoundaryAtlas;

use crate::boundaries::{BoundaryError, atlas_from_geojson_str};
use crate::indicators::IndicatorCatalogue;
use crate::manifest::{MANIFEST_VERSION, PackageManifest, PartKind};
use crate::observations::{ObservationError, ObservationTable};

pub const MANIFEST_FILE_NAME: &str = "package.manifest.json";

/// A fully materialized dataset package: everything the dashboard needs
/// before its first render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPackage {
    pub manifest: PackageManifest,
    pub table: ObservationTable,
    pub atlas: BoundaryAtlas,
    pub catalogue: IndicatorCatalogue,
}

#[derive(Debug)]
pub enum PackageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    ManifestParse(serde_json::Error),
    UnsupportedVersion {
        found: String,
    },
    MissingPart(&'static str),
    HashMismatch {
        path: PathBuf,
    },
    Observations(ObservationError),
    Boundaries(BoundaryError),
    Indicators(serde_json::Error),
}

impl fmt::Display for PackageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            PackageError::ManifestParse(err) => write!(f, "manifest parse error: {err}"),
            PackageError::UnsupportedVersion { found } => {
                write!(f, "unsupported manifest version: {found}")
            }
            PackageError::MissingPart(kind) => write!(f, "manifest has no {kind} part"),
            PackageError::HashMismatch { path } => {
                write!(f, "content hash mismatch for {}", path.display())
            }
            PackageError::Observations(err) => write!(f, "observations: {err}"),
            PackageError::Boundaries(err) => write!(f, "boundaries: {err}"),
            PackageError::Indicators(err) => write!(f, "indicator catalogue: {err}"),
        }
    }
}

impl std::error::Error for PackageError {}

impl DataPackage {
    /// Loads and verifies a package directory.
    ///
    /// Observation and boundary parts are required; the indicator catalogue
    /// part is optional and falls back to the built-in one. Parts carrying a
    /// `content_hash` are verified against their payload.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, PackageError> {
        let root = root.as_ref();
        let manifest_path = root.join(MANIFEST_FILE_NAME);
        let payload = fs::read_to_string(&manifest_path).map_err(|e| PackageError::Io {
            path: manifest_path,
            source: e,
        })?;
        let manifest: PackageManifest =
            serde_json::from_str(&payload).map_err(PackageError::ManifestParse)?;

        if manifest.version != MANIFEST_VERSION {
            return Err(PackageError::UnsupportedVersion {
                found: manifest.version,
            });
        }

        let observations = read_part(root, &manifest, PartKind::Observations)?
            .ok_or(PackageError::MissingPart("observations"))?;
        let table =
            ObservationTable::from_json_str(&observations).map_err(PackageError::Observations)?;

        let boundaries = read_part(root, &manifest, PartKind::Boundaries)?
            .ok_or(PackageError::MissingPart("boundaries"))?;
        let atlas = atlas_from_geojson_str(&boundaries).map_err(PackageError::Boundaries)?;

        let catalogue = match read_part(root, &manifest, PartKind::Indicators)? {
            Some(payload) => {
                IndicatorCatalogue::from_json_str(&payload).map_err(PackageError::Indicators)?
            }
            None => IndicatorCatalogue::built_in(),
        };

        Ok(Self {
            manifest,
            table,
            atlas,
            catalogue,
        })
    }
}

fn read_part(
    root: &Path,
    manifest: &PackageManifest,
    kind: PartKind,
) -> Result<Option<String>, PackageError> {
    let Some(entry) = manifest.part(kind) else {
        return Ok(None);
    };

    let path = root.join(&entry.path);
    let payload = fs::read_to_string(&path).map_err(|e| PackageError::Io {
        path: path.clone(),
        source: e,
    })?;

    if let Some(expected) = &entry.content_hash {
        let actual = blake3::hash(payload.as_bytes()).to_hex().to_string();
        if actual != *expected {
            return Err(PackageError::HashMismatch { path });
        }
    }

    Ok(Some(payload))
}

#[cfg(test)]
mod tests {
    use super::{DataPackage, MANIFEST_FILE_NAME, PackageError};
    use crate::manifest::{PackageManifest, PartEntry, PartKind};
    use std::fs;
    use std::path::PathBuf;

    const OBSERVATIONS: &str =
        r#"[{"CountryCode": "USA", "IndicatorName": "X", "Year": 2010, "Value": 10}]"#;
    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": 840, "properties": {"name": "United States"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}
        ]
    }"#;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        let id = format!("dashboard_package_{label}_{}", std::process::id());
        dir.push(id);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn write_package(root: &PathBuf, with_hashes: bool) {
        fs::write(root.join("observations.json"), OBSERVATIONS).expect("write observations");
        fs::write(root.join("boundaries.json"), BOUNDARIES).expect("write boundaries");

        let hash =
            |payload: &str| Some(blake3::hash(payload.as_bytes()).to_hex().to_string());

        let mut manifest = PackageManifest::new("test-package");
        manifest.parts.push(PartEntry {
            kind: PartKind::Observations,
            path: "observations.json".to_string(),
            content_hash: if with_hashes { hash(OBSERVATIONS) } else { None },
        });
        manifest.parts.push(PartEntry {
            kind: PartKind::Boundaries,
            path: "boundaries.json".to_string(),
            content_hash: if with_hashes { hash(BOUNDARIES) } else { None },
        });

        let payload = serde_json::to_string_pretty(&manifest).expect("serialize manifest");
        fs::write(root.join(MANIFEST_FILE_NAME), payload).expect("write manifest");
    }

    #[test]
    fn loads_a_verified_package() {
        let root = temp_dir("verified");
        write_package(&root, true);

        let package = DataPackage::load(&root).expect("load package");
        assert_eq!(package.table.rows.len(), 1);
        assert!(package.atlas.get(840).is_some());
        // No indicators part: the built-in catalogue is used.
        assert!(package.catalogue.find("SP.POP.TOTL").is_some());
    }

    #[test]
    fn rejects_a_tampered_part() {
        let root = temp_dir("tampered");
        write_package(&root, true);
        fs::write(root.join("observations.json"), "[]").expect("tamper");

        let err = DataPackage::load(&root).expect_err("expect hash mismatch");
        assert!(matches!(err, PackageError::HashMismatch { .. }));
    }

    #[test]
    fn unhashed_parts_skip_verification() {
        let root = temp_dir("unhashed");
        write_package(&root, false);
        assert!(DataPackage::load(&root).is_ok());
    }

    #[test]
    fn missing_required_part_is_an_error() {
        let root = temp_dir("missing");
        write_package(&root, false);
        let manifest_payload = fs::read_to_string(root.join(MANIFEST_FILE_NAME)).unwrap();
        let mut manifest: PackageManifest = serde_json::from_str(&manifest_payload).unwrap();
        manifest.parts.retain(|p| p.kind != PartKind::Boundaries);
        fs::write(
            root.join(MANIFEST_FILE_NAME),
            serde_json::to_string(&manifest).unwrap(),
        )
        .unwrap();

        let err = DataPackage::load(&root).expect_err("expect missing part");
        assert!(matches!(err, PackageError::MissingPart("boundaries")));
    }

    #[test]
    fn loads_the_demo_assets_package() {
        let root =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../apps/dashboard/assets");
        let package = DataPackage::load(root).expect("load demo package");
        assert!(!package.atlas.is_empty());
        assert!(!package.table.rows.is_empty());
    }
}
