use std::collections::BTreeMap;
use std::collections::BTreeSet;

use foundation::bounds::GeoBounds;

/// Structured identity of a rendered country, attached to every primitive
/// the render stage emits. Hover routing hands these back instead of
/// encoding the code into a class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRef {
    pub code: u32,
    pub name: String,
}

/// One country boundary: a numeric code, a display name, and polygon rings
/// in lon/lat degrees (outer ring first, then holes, per polygon).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub code: u32,
    pub name: String,
    pub polygons: Vec<Vec<Vec<[f64; 2]>>>,
}

impl BoundaryFeature {
    pub fn feature_ref(&self) -> FeatureRef {
        FeatureRef {
            code: self.code,
            name: self.name.clone(),
        }
    }

    pub fn bounds(&self) -> GeoBounds {
        let mut out = GeoBounds::empty();
        for polygon in &self.polygons {
            for ring in polygon {
                for [lon, lat] in ring {
                    out.extend(*lon, *lat);
                }
            }
        }
        out
    }
}

/// Immutable store of boundary features, indexed by numeric code.
///
/// Built once from the loaded geometry source; the render pipeline only ever
/// reads from it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BoundaryAtlas {
    features: Vec<BoundaryFeature>,
    by_code: BTreeMap<u32, usize>,
}

impl BoundaryAtlas {
    pub fn new(features: Vec<BoundaryFeature>) -> Self {
        let mut by_code = BTreeMap::new();
        for (idx, feature) in features.iter().enumerate() {
            // First occurrence wins; duplicate codes in the source are dropped.
            by_code.entry(feature.code).or_insert(idx);
        }
        Self { features, by_code }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    pub fn get(&self, code: u32) -> Option<&BoundaryFeature> {
        let idx = *self.by_code.get(&code)?;
        self.features.get(idx)
    }

    /// Merged geographic extent of the given codes. Codes with no geometry
    /// are silently absent, matching the render policy.
    pub fn bounds_of(&self, codes: &BTreeSet<u32>) -> GeoBounds {
        let mut out = GeoBounds::empty();
        for code in codes {
            if let Some(feature) = self.get(*code) {
                out.merge(&feature.bounds());
            }
        }
        out
    }
}
