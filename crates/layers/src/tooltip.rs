use std::collections::BTreeMap;

use directory::Directory;
use foundation::format::{NOT_AVAILABLE, format_magnitude};
use foundation::math::Vec2;
use model::{BoundaryAtlas, FeatureRef, YearInterval};
use runtime::cycle::Cycle;
use runtime::event_bus::{EventBus, Notice};

use crate::choropleth::ChoroplethLayer;
use crate::membership::SelectionMembership;

/// Everything the tooltip needs from the current cycle's state.
#[derive(Debug, Clone, Copy)]
pub struct HoverContext<'a> {
    pub indicator_name: &'a str,
    pub interval: Option<YearInterval>,
    pub aggregates: &'a BTreeMap<String, f64>,
    pub all_selected: &'a [String],
    pub dir: &'a Directory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipSnapshot {
    pub country: String,
    pub years: String,
    pub indicator: String,
    pub value: String,
    /// Tracks the pointer; re-issued on every pointer move.
    pub position: Vec2,
}

/// Border restoration for a feature the pointer just left. Always computed
/// from the *current* selection state, never from a cached default.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeReset {
    pub feature: FeatureRef,
    pub stroke: &'static str,
    pub stroke_width: f64,
}

/// Pointer-hover state machine over the rendered map.
///
/// Hover targets arrive as structured feature identities, so there is
/// nothing to parse; a code with no geometry behind it is ignored outright.
#[derive(Debug, Default)]
pub struct HoverTracker {
    active: Option<FeatureRef>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&FeatureRef> {
        self.active.as_ref()
    }

    /// Enters (or moves within) a feature. Returns the tooltip to show, or
    /// `None` for an unknown code. Entering a country that is part of the
    /// selection notifies external listeners, once per entry.
    pub fn hover(
        &mut self,
        atlas: &BoundaryAtlas,
        code: u32,
        pointer: Vec2,
        ctx: &HoverContext<'_>,
        cycle: Cycle,
        bus: &mut EventBus,
    ) -> Option<TooltipSnapshot> {
        let feature = atlas.get(code)?;
        let entered = self.active.as_ref().map(|f| f.code) != Some(code);
        self.active = Some(feature.feature_ref());

        if entered && is_selected(&feature.name, ctx) {
            bus.emit(
                cycle,
                Notice::MapItemHover {
                    country: feature.name.clone(),
                },
            );
        }

        let value = ctx
            .dir
            .alpha3_of(code)
            .and_then(|alpha3| ctx.aggregates.get(alpha3))
            .map(|v| format_magnitude(*v))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Some(TooltipSnapshot {
            country: feature.name.clone(),
            years: ctx
                .interval
                .map(|i| format!("{}-{}", i.min_year, i.max_year))
                .unwrap_or_default(),
            indicator: ctx.indicator_name.to_string(),
            value,
            position: pointer,
        })
    }

    /// Leaves the active feature: hides the tooltip and hands back the
    /// border the feature should return to under the current selection.
    pub fn unhover(
        &mut self,
        layer: &ChoroplethLayer,
        membership: &SelectionMembership,
        ctx: &HoverContext<'_>,
        cycle: Cycle,
        bus: &mut EventBus,
    ) -> Option<StrokeReset> {
        let feature = self.active.take()?;

        if is_selected(&feature.name, ctx) {
            bus.emit(
                cycle,
                Notice::MapItemUnhover {
                    country: feature.name.clone(),
                },
            );
        }

        let (stroke, stroke_width) = layer.stroke_for(feature.code, membership);
        Some(StrokeReset {
            feature,
            stroke,
            stroke_width,
        })
    }
}

fn is_selected(name: &str, ctx: &HoverContext<'_>) -> bool {
    ctx.all_selected
        .iter()
        .any(|selected| ctx.dir.is_same_country_name(selected, name))
}
