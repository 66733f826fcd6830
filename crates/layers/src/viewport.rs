use foundation::bounds::GeoBounds;
use foundation::math::{Projection, Vec2};

/// Padding around a fitted selection, in pixels.
const FIT_PADDING_PX: f64 = 24.0;

/// The persistent map viewport. Everything else in the render state is
/// rebuilt each cycle; the viewport carries over until the selection changes
/// or the user pans/zooms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub size_px: [f64; 2],
    pub projection: Projection,
}

impl Viewport {
    pub fn new(size_px: [f64; 2]) -> Self {
        Self {
            size_px,
            projection: Projection::fit_world(size_px),
        }
    }

    /// Fits the viewport to the selected geometry, or resets to the default
    /// world view when nothing selected has geometry.
    pub fn fit_selection(&mut self, bounds: &GeoBounds) {
        self.projection = if bounds.is_empty() {
            Projection::fit_world(self.size_px)
        } else {
            Projection::fit_bounds(bounds, self.size_px, FIT_PADDING_PX)
        };
    }

    pub fn reset_world(&mut self) {
        self.projection = Projection::fit_world(self.size_px);
    }

    pub fn pan(&mut self, dx_px: f64, dy_px: f64) {
        self.projection = self.projection.panned_by(dx_px, dy_px);
    }

    pub fn zoom(&mut self, factor: f64, anchor_px: Vec2) {
        if factor > 0.0 {
            self.projection = self.projection.zoomed_by(factor, anchor_px);
        }
    }
}
