use super::Vec2;
use crate::bounds::GeoBounds;

/// Full longitude span of the projection plane (degrees).
pub const LON_SPAN_DEG: f64 = 360.0;
/// Full latitude span of the projection plane (degrees).
pub const LAT_SPAN_DEG: f64 = 180.0;

/// Smallest geographic span a viewport fit will zoom into (degrees).
const MIN_FIT_SPAN_DEG: f64 = 1.0;

/// Equirectangular map projection with a uniform scale and a pixel translate.
///
/// Screen space has `y` growing downward, so northern latitudes map to
/// smaller `y` values. All operations are pure; panning and zooming return a
/// new projection rather than mutating in place.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    /// Pixels per degree.
    pub scale: f64,
    /// Screen position of (lon 0, lat 0).
    pub translate: Vec2,
}

impl Projection {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Fits the whole world into `viewport_px`, centered.
    pub fn fit_world(viewport_px: [f64; 2]) -> Self {
        let scale = (viewport_px[0] / LON_SPAN_DEG).min(viewport_px[1] / LAT_SPAN_DEG);
        Self {
            scale,
            translate: Vec2::new(viewport_px[0] * 0.5, viewport_px[1] * 0.5),
        }
    }

    /// Fits `bounds` into `viewport_px` with `padding_px` on every side.
    ///
    /// Empty bounds fall back to the world fit. Degenerate (point-sized)
    /// bounds are widened to [`MIN_FIT_SPAN_DEG`] so the scale stays finite.
    pub fn fit_bounds(bounds: &GeoBounds, viewport_px: [f64; 2], padding_px: f64) -> Self {
        if bounds.is_empty() {
            return Self::fit_world(viewport_px);
        }

        let span_lon = bounds.width().max(MIN_FIT_SPAN_DEG);
        let span_lat = bounds.height().max(MIN_FIT_SPAN_DEG);
        let usable_w = (viewport_px[0] - 2.0 * padding_px).max(1.0);
        let usable_h = (viewport_px[1] - 2.0 * padding_px).max(1.0);
        let scale = (usable_w / span_lon).min(usable_h / span_lat);

        let [cx, cy] = bounds.center();
        Self {
            scale,
            translate: Vec2::new(
                viewport_px[0] * 0.5 - cx * scale,
                viewport_px[1] * 0.5 + cy * scale,
            ),
        }
    }

    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        Vec2::new(
            self.translate.x + lon_deg * self.scale,
            self.translate.y - lat_deg * self.scale,
        )
    }

    pub fn unproject(&self, screen: Vec2) -> (f64, f64) {
        (
            (screen.x - self.translate.x) / self.scale,
            (self.translate.y - screen.y) / self.scale,
        )
    }

    pub fn panned_by(&self, dx_px: f64, dy_px: f64) -> Self {
        Self {
            scale: self.scale,
            translate: Vec2::new(self.translate.x + dx_px, self.translate.y + dy_px),
        }
    }

    /// Zooms by `factor`, keeping the geographic point under `anchor_px`
    /// fixed on screen.
    pub fn zoomed_by(&self, factor: f64, anchor_px: Vec2) -> Self {
        Self {
            scale: self.scale * factor,
            translate: Vec2::new(
                anchor_px.x + (self.translate.x - anchor_px.x) * factor,
                anchor_px.y + (self.translate.y - anchor_px.y) * factor,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Projection, Vec2};
    use crate::bounds::GeoBounds;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn world_fit_centers_the_origin() {
        let p = Projection::fit_world([720.0, 360.0]);
        let origin = p.project(0.0, 0.0);
        assert_eq!(origin, Vec2::new(360.0, 180.0));
        // 720px over 360 degrees: 2 px/deg
        assert_eq!(p.scale, 2.0);
    }

    #[test]
    fn screen_y_grows_southward() {
        let p = Projection::fit_world([720.0, 360.0]);
        let north = p.project(0.0, 45.0);
        let south = p.project(0.0, -45.0);
        assert!(north.y < south.y);
    }

    #[test]
    fn project_unproject_round_trip() {
        let p = Projection::fit_world([1024.0, 512.0]);
        let (lon, lat) = p.unproject(p.project(-73.5, 45.2));
        assert_close(lon, -73.5, 1e-9);
        assert_close(lat, 45.2, 1e-9);
    }

    #[test]
    fn bounds_fit_centers_the_box() {
        let mut b = GeoBounds::empty();
        b.extend(10.0, 40.0);
        b.extend(30.0, 60.0);
        let p = Projection::fit_bounds(&b, [800.0, 600.0], 20.0);
        let center = p.project(20.0, 50.0);
        assert_close(center.x, 400.0, 1e-9);
        assert_close(center.y, 300.0, 1e-9);
    }

    #[test]
    fn empty_bounds_fall_back_to_world() {
        let p = Projection::fit_bounds(&GeoBounds::empty(), [720.0, 360.0], 0.0);
        assert_eq!(p, Projection::fit_world([720.0, 360.0]));
    }

    #[test]
    fn zoom_keeps_the_anchor_fixed() {
        let p = Projection::fit_world([720.0, 360.0]);
        let anchor = p.project(30.0, -10.0);
        let zoomed = p.zoomed_by(2.0, anchor);
        let after = zoomed.project(30.0, -10.0);
        assert_close(after.x, anchor.x, 1e-9);
        assert_close(after.y, anchor.y, 1e-9);
        assert_eq!(zoomed.scale, p.scale * 2.0);
    }
}
