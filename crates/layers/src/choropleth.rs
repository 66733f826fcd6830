use std::collections::BTreeMap;

use compute::bins::ValueBin;
use compute::scale::LinearScale;
use directory::Directory;
use foundation::math::{Projection, Vec2};
use model::{BoundaryAtlas, FeatureRef};

use crate::layer::{Layer, LayerId};
use crate::membership::SelectionMembership;
use crate::symbology::{
    BASE_STROKE, COMPARISON_STROKE, ChoroplethStyle, FOCUS_STROKE, fill_for,
};

/// One projected country outline with its resolved styling.
///
/// `fill: None` renders as `fill:none`; the emphasis pass relies on that to
/// avoid double-compositing over the base pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub feature: FeatureRef,
    pub rings: Vec<Vec<Vec2>>,
    pub fill: Option<&'static str>,
    pub fill_opacity: f64,
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub value: Option<f64>,
    pub bin: ValueBin,
}

/// Output of one render cycle over the map surface.
///
/// `base` holds every country once; `emphasis` holds only selected countries,
/// drawn after (on top of) the base pass. The two-pass split is what keeps an
/// emphasized border visible when two selected countries share an edge: the
/// neighbor's base-pass white border can never occlude it, and the
/// transparent emphasis fill never covers the neighbor's color.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoroplethSnapshot {
    pub base: Vec<CountryShape>,
    pub emphasis: Vec<CountryShape>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethLayer {
    id: LayerId,
    pub style: ChoroplethStyle,
}

impl ChoroplethLayer {
    pub fn new(id: u64, style: ChoroplethStyle) -> Self {
        Self {
            id: LayerId(id),
            style,
        }
    }

    /// Runs both render passes for the current cycle.
    ///
    /// Aggregates are keyed by alpha-3 code; geometry is keyed by numeric
    /// code. The directory bridges the two. A country with no aggregate gets
    /// the missing bin, never zero.
    pub fn extract(
        &self,
        atlas: &BoundaryAtlas,
        aggregates: &BTreeMap<String, f64>,
        scale: &LinearScale,
        membership: &SelectionMembership,
        dir: &Directory,
        projection: &Projection,
    ) -> ChoroplethSnapshot {
        let mut out = ChoroplethSnapshot::default();

        for feature in atlas.features() {
            let value = dir
                .alpha3_of(feature.code)
                .and_then(|alpha3| aggregates.get(alpha3))
                .copied();
            let bin = ValueBin::for_normalized(value.map(|v| scale.normalize(v)));
            let rings = project_rings(&feature.polygons, projection);

            out.base.push(CountryShape {
                feature: feature.feature_ref(),
                rings: rings.clone(),
                fill: Some(fill_for(bin)),
                fill_opacity: self.style.fill_opacity,
                stroke: BASE_STROKE,
                stroke_width: self.style.base_stroke_width,
                value,
                bin,
            });

            if membership.contains(feature.code) {
                let (stroke, stroke_width) = self.stroke_for(feature.code, membership);
                out.emphasis.push(CountryShape {
                    feature: feature.feature_ref(),
                    rings,
                    fill: None,
                    fill_opacity: 0.0,
                    stroke,
                    stroke_width,
                    value,
                    bin,
                });
            }
        }

        out
    }

    /// The border a feature should carry under the current selection: focus
    /// color for the exact focus country, comparison color for other
    /// selected countries, the neutral base border otherwise.
    ///
    /// Hover-leave resets call this so the restored border always matches
    /// the current selection state, even if the selection changed while the
    /// pointer was down on the feature.
    pub fn stroke_for(
        &self,
        code: u32,
        membership: &SelectionMembership,
    ) -> (&'static str, f64) {
        if membership.is_focus(code) {
            (
                FOCUS_STROKE,
                self.style.base_stroke_width * self.style.emphasis_width_factor,
            )
        } else if membership.contains(code) {
            (
                COMPARISON_STROKE,
                self.style.base_stroke_width * self.style.emphasis_width_factor,
            )
        } else {
            (BASE_STROKE, self.style.base_stroke_width)
        }
    }

    /// Recomputes both path layers for a new projection, leaving every color
    /// and width decision untouched. Pan/zoom goes through here instead of a
    /// full [`extract`](Self::extract).
    pub fn reproject(
        &self,
        snapshot: &ChoroplethSnapshot,
        atlas: &BoundaryAtlas,
        projection: &Projection,
    ) -> ChoroplethSnapshot {
        let reproject_pass = |shapes: &[CountryShape]| {
            shapes
                .iter()
                .map(|shape| {
                    let rings = atlas
                        .get(shape.feature.code)
                        .map(|feature| project_rings(&feature.polygons, projection))
                        .unwrap_or_default();
                    CountryShape {
                        rings,
                        ..shape.clone()
                    }
                })
                .collect()
        };

        ChoroplethSnapshot {
            base: reproject_pass(&snapshot.base),
            emphasis: reproject_pass(&snapshot.emphasis),
        }
    }
}

impl Layer for ChoroplethLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

fn project_rings(polygons: &[Vec<Vec<[f64; 2]>>], projection: &Projection) -> Vec<Vec<Vec2>> {
    let mut out = Vec::new();
    for polygon in polygons {
        for ring in polygon {
            out.push(
                ring.iter()
                    .map(|[lon, lat]| projection.project(*lon, *lat))
                    .collect(),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{ChoroplethLayer, ChoroplethSnapshot};
    use crate::membership::SelectionMembership;
    use crate::symbology::{
        BASE_STROKE, COMPARISON_STROKE, ChoroplethStyle, FOCUS_STROKE, MISSING_FILL,
    };
    use compute::scale::LinearScale;
    use directory::Directory;
    use foundation::math::Projection;
    use model::{BoundaryAtlas, BoundaryFeature};
    use std::collections::BTreeMap;

    fn rect(code: u32, name: &str, min: [f64; 2], max: [f64; 2]) -> BoundaryFeature {
        BoundaryFeature {
            code,
            name: name.to_string(),
            polygons: vec![vec![vec![
                [min[0], min[1]],
                [max[0], min[1]],
                [max[0], max[1]],
                [min[0], max[1]],
                [min[0], min[1]],
            ]]],
        }
    }

    // Kenya and Tanzania share a border on purpose.
    fn test_atlas() -> BoundaryAtlas {
        BoundaryAtlas::new(vec![
            rect(404, "Kenya", [34.0, -4.0], [41.0, 5.0]),
            rect(834, "Tanzania", [30.0, -12.0], [41.0, -4.0]),
            rect(76, "Brazil", [-74.0, -34.0], [-34.0, 5.0]),
        ])
    }

    fn extract_with(
        selected: &[&str],
        focus: Option<&str>,
        aggregates: BTreeMap<String, f64>,
    ) -> (ChoroplethLayer, ChoroplethSnapshot) {
        let dir = Directory::embedded();
        let atlas = test_atlas();
        let selected: Vec<String> = selected.iter().map(|s| s.to_string()).collect();
        let membership = SelectionMembership::resolve(&selected, focus, dir);
        let scale = LinearScale::from_values(aggregates.values().copied());
        let layer = ChoroplethLayer::new(1, ChoroplethStyle::default());
        let projection = Projection::fit_world([720.0, 360.0]);
        let snapshot = layer.extract(&atlas, &aggregates, &scale, &membership, dir, &projection);
        (layer, snapshot)
    }

    #[test]
    fn base_pass_draws_every_feature_once() {
        let aggregates: BTreeMap<String, f64> =
            [("KEN".to_string(), 10.0), ("TZA".to_string(), 50.0)].into();
        let (_, snapshot) = extract_with(&[], None, aggregates);

        assert_eq!(snapshot.base.len(), 3);
        assert!(snapshot.emphasis.is_empty());
        for shape in &snapshot.base {
            assert_eq!(shape.stroke, BASE_STROKE);
            assert!(shape.fill.is_some());
        }
    }

    #[test]
    fn missing_aggregate_renders_gray_not_zero() {
        let aggregates: BTreeMap<String, f64> =
            [("KEN".to_string(), 10.0), ("TZA".to_string(), 50.0)].into();
        let (_, snapshot) = extract_with(&[], None, aggregates);

        let brazil = snapshot
            .base
            .iter()
            .find(|s| s.feature.code == 76)
            .unwrap();
        assert_eq!(brazil.fill, Some(MISSING_FILL));
        assert_eq!(brazil.value, None);
    }

    #[test]
    fn emphasis_pass_has_transparent_fill_and_doubled_border() {
        let aggregates: BTreeMap<String, f64> = [("KEN".to_string(), 10.0)].into();
        let (layer, snapshot) = extract_with(&["Kenya", "Tanzania"], Some("Kenya"), aggregates);

        assert_eq!(snapshot.emphasis.len(), 2);
        let kenya = snapshot
            .emphasis
            .iter()
            .find(|s| s.feature.code == 404)
            .unwrap();
        let tanzania = snapshot
            .emphasis
            .iter()
            .find(|s| s.feature.code == 834)
            .unwrap();

        // Shared border: both neighbors emphasized, neither fill occludes.
        assert_eq!(kenya.fill, None);
        assert_eq!(tanzania.fill, None);
        assert_eq!(kenya.stroke, FOCUS_STROKE);
        assert_eq!(tanzania.stroke, COMPARISON_STROKE);
        assert_eq!(
            kenya.stroke_width,
            layer.style.base_stroke_width * layer.style.emphasis_width_factor
        );
    }

    #[test]
    fn selected_region_emphasizes_member_countries() {
        let aggregates: BTreeMap<String, f64> = BTreeMap::new();
        let (_, snapshot) = extract_with(&["Sub-Saharan Africa"], None, aggregates);

        let codes: Vec<u32> = snapshot.emphasis.iter().map(|s| s.feature.code).collect();
        assert!(codes.contains(&404));
        assert!(codes.contains(&834));
        assert!(!codes.contains(&76));
    }

    #[test]
    fn stroke_for_tracks_current_membership() {
        let aggregates: BTreeMap<String, f64> = BTreeMap::new();
        let (layer, _) = extract_with(&[], None, aggregates);
        let dir = Directory::embedded();

        let selected = vec!["Kenya".to_string(), "Brazil".to_string()];
        let membership = SelectionMembership::resolve(&selected, Some("Kenya"), dir);

        assert_eq!(layer.stroke_for(404, &membership).0, FOCUS_STROKE);
        assert_eq!(layer.stroke_for(76, &membership).0, COMPARISON_STROKE);
        assert_eq!(layer.stroke_for(834, &membership).0, BASE_STROKE);
    }

    #[test]
    fn reproject_changes_paths_but_not_styling() {
        let aggregates: BTreeMap<String, f64> = [("KEN".to_string(), 10.0)].into();
        let (layer, snapshot) = extract_with(&["Kenya"], Some("Kenya"), aggregates);

        let atlas = test_atlas();
        let zoomed = Projection::fit_world([720.0, 360.0])
            .zoomed_by(2.0, foundation::math::Vec2::new(0.0, 0.0));
        let reprojected = layer.reproject(&snapshot, &atlas, &zoomed);

        assert_eq!(reprojected.base.len(), snapshot.base.len());
        assert_eq!(reprojected.emphasis.len(), snapshot.emphasis.len());
        for (before, after) in snapshot.base.iter().zip(&reprojected.base) {
            assert_eq!(before.fill, after.fill);
            assert_eq!(before.stroke, after.stroke);
            assert_ne!(before.rings, after.rings);
        }
    }

    #[test]
    fn extracts_from_parsed_demo_boundaries() {
        let payload = include_str!("../../apps/dashboard/assets/boundaries.json");
        let atlas = formats::atlas_from_geojson_str(payload).expect("parse demo boundaries");

        let dir = Directory::embedded();
        let membership = SelectionMembership::resolve(&[], None, dir);
        let layer = ChoroplethLayer::new(1, ChoroplethStyle::default());
        let snapshot = layer.extract(
            &atlas,
            &BTreeMap::new(),
            &LinearScale::default(),
            &membership,
            dir,
            &Projection::fit_world([720.0, 360.0]),
        );
        assert_eq!(snapshot.base.len(), atlas.len());
    }
}
