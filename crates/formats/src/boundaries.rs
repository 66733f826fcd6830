use serde_json::Value;

use model::{BoundaryAtlas, BoundaryFeature};

#[derive(Debug)]
pub enum BoundaryError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

/// Parses a GeoJSON FeatureCollection of country boundaries into a
/// [`BoundaryAtlas`].
///
/// The source is expected pre-converted from topology to boundary polygons:
/// only `Polygon` and `MultiPolygon` geometries are accepted. Each feature
/// needs a numeric `id` and a `properties.name`; features without either are
/// skipped rather than rejected — an area with no routable identity is
/// simply absent from rendering.
pub fn atlas_from_geojson_str(payload: &str) -> Result<BoundaryAtlas, BoundaryError> {
    let value: Value = serde_json::from_str(payload).map_err(|e| BoundaryError::InvalidFeature {
        index: 0,
        reason: format!("JSON parse error: {e}"),
    })?;
    atlas_from_geojson_value(value)
}

pub fn atlas_from_geojson_value(value: Value) -> Result<BoundaryAtlas, BoundaryError> {
    let obj = value
        .as_object()
        .ok_or(BoundaryError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(BoundaryError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(BoundaryError::NotAFeatureCollection);
    }

    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(BoundaryError::NotAFeatureCollection)?;

    let mut features = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        let feat_obj = feat_val.as_object().ok_or(BoundaryError::InvalidFeature {
            index,
            reason: "feature must be an object".to_string(),
        })?;

        let Some(code) = parse_feature_code(feat_obj.get("id")) else {
            continue;
        };
        let Some(name) = feat_obj
            .get("properties")
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
        else {
            continue;
        };

        let geometry_val = feat_obj
            .get("geometry")
            .ok_or(BoundaryError::InvalidFeature {
                index,
                reason: "feature missing geometry".to_string(),
            })?;
        let polygons = parse_boundary_geometry(geometry_val)
            .map_err(|reason| BoundaryError::InvalidFeature { index, reason })?;

        features.push(BoundaryFeature {
            code,
            name: name.to_string(),
            polygons,
        });
    }

    Ok(BoundaryAtlas::new(features))
}

/// World-atlas ids arrive as numbers or zero-padded strings ("076");
/// sentinel ids that do not parse yield `None`.
fn parse_feature_code(id: Option<&Value>) -> Option<u32> {
    match id? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn parse_boundary_geometry(value: &Value) -> Result<Vec<Vec<Vec<[f64; 2]>>>, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(vec![parse_polygon(coords)?]),
        "MultiPolygon" => parse_multi_polygon(coords),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_position(value: &Value) -> Result<[f64; 2], String> {
    let arr = value
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok([lon, lat])
}

fn parse_ring(value: &Value) -> Result<Vec<[f64; 2]>, String> {
    let arr = value
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for position in arr {
        out.push(parse_position(position)?);
    }
    Ok(out)
}

fn parse_polygon(coords: &Value) -> Result<Vec<Vec<[f64; 2]>>, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<[f64; 2]>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_polygon(poly)?);
    }
    Ok(out)
}
