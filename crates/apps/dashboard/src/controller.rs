//! Dashboard controller: owns the selection model, the loaded dataset, and
//! the persistent viewport, and turns every command into one full render
//! cycle (mutate, re-aggregate, re-render) before the next command runs.

use compute::aggregate::{AggregatedValues, aggregate_by_country};
use compute::scale::LinearScale;
use directory::Directory;
use foundation::math::Vec2;
use formats::package::DataPackage;
use layers::choropleth::{ChoroplethLayer, ChoroplethSnapshot};
use layers::legend::{LegendSnapshot, build_legend};
use layers::membership::SelectionMembership;
use layers::symbology::ChoroplethStyle;
use layers::tooltip::{HoverContext, HoverTracker, StrokeReset, TooltipSnapshot};
use layers::viewport::Viewport;
use model::{AreaRequest, SelectionModel};
use runtime::cycle::Cycle;
use runtime::event_bus::{EventBus, Notice};
use runtime::metrics::Metrics;
use runtime::queue::CommandQueue;

pub const MAP_SIZE_PX: [f64; 2] = [960.0, 500.0];

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardCommand {
    SetArea(AreaRequest),
    AddComparison(String),
    RemoveComparison(String),
    SetIndicator(String),
    SetInterval {
        min_year: Option<i32>,
        max_year: Option<i32>,
    },
    SetItems {
        area: AreaRequest,
        indicator: String,
        min_year: Option<i32>,
        max_year: Option<i32>,
    },
}

/// Everything one render cycle produced. Rebuilt wholesale; only the
/// viewport survives between cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub map: ChoroplethSnapshot,
    pub legend: LegendSnapshot,
    pub scale: LinearScale,
    pub aggregates: AggregatedValues,
    pub membership: SelectionMembership,
}

pub struct DashboardController {
    dir: &'static Directory,
    package: DataPackage,
    selection: SelectionModel,
    viewport: Viewport,
    layer: ChoroplethLayer,
    hover: HoverTracker,
    queue: CommandQueue<DashboardCommand>,
    bus: EventBus,
    metrics: Metrics,
    cycle: Cycle,
    output: RenderOutput,
    tooltip: Option<TooltipSnapshot>,
}

impl DashboardController {
    /// Builds the controller and runs the initial render cycle over the
    /// session defaults (world focus, default indicator, no interval).
    pub fn new(package: DataPackage) -> Self {
        let dir = Directory::embedded();
        let indicator = package
            .catalogue
            .default_entry()
            .map(|e| e.code.clone())
            .unwrap_or_default();

        let mut controller = Self {
            dir,
            package,
            selection: SelectionModel::new(indicator),
            viewport: Viewport::new(MAP_SIZE_PX),
            layer: ChoroplethLayer::new(1, ChoroplethStyle::default()),
            hover: HoverTracker::new(),
            queue: CommandQueue::new(),
            bus: EventBus::new(),
            metrics: Metrics::new(),
            cycle: Cycle::new(0),
            output: RenderOutput {
                map: ChoroplethSnapshot::default(),
                legend: build_legend("", &LinearScale::default()),
                scale: LinearScale::default(),
                aggregates: AggregatedValues::new(),
                membership: SelectionMembership::default(),
            },
            tooltip: None,
        };
        controller.run_cycle();
        controller
    }

    /// Enqueues a command and drains the queue to completion.
    ///
    /// The drain guard keeps the cycle non-reentrant: commands submitted
    /// from inside a running cycle are appended and processed by the
    /// already-active loop, in order.
    pub fn submit(&mut self, command: DashboardCommand) {
        self.queue.push(command);
        if !self.queue.begin_drain() {
            return;
        }
        while let Some(command) = self.queue.next() {
            let emitted_before = self.bus.events().len();
            self.apply(command);
            let selection_changed = self.bus.events()[emitted_before..]
                .iter()
                .any(|e| e.notice == Notice::SelectionChanged);
            if selection_changed {
                self.run_cycle();
            }
        }
        self.queue.end_drain();
    }

    fn apply(&mut self, command: DashboardCommand) {
        let (dir, cycle) = (self.dir, self.cycle);
        match command {
            DashboardCommand::SetArea(request) => {
                self.selection.set_area(request, dir, cycle, &mut self.bus);
            }
            DashboardCommand::AddComparison(name) => {
                self.selection
                    .add_comparison(&name, dir, cycle, &mut self.bus);
            }
            DashboardCommand::RemoveComparison(name) => {
                self.selection
                    .remove_comparison(&name, dir, cycle, &mut self.bus);
            }
            DashboardCommand::SetIndicator(code) => {
                self.selection.set_indicator(&code, cycle, &mut self.bus);
            }
            DashboardCommand::SetInterval { min_year, max_year } => {
                self.selection
                    .set_interval(min_year, max_year, cycle, &mut self.bus);
            }
            DashboardCommand::SetItems {
                area,
                indicator,
                min_year,
                max_year,
            } => {
                self.selection.set_items(
                    area,
                    &indicator,
                    min_year,
                    max_year,
                    dir,
                    cycle,
                    &mut self.bus,
                );
            }
        }
    }

    /// One full render cycle: membership, viewport fit, aggregation, scale,
    /// both map passes, legend.
    fn run_cycle(&mut self) {
        self.cycle = self.cycle.next();

        let membership = SelectionMembership::resolve(
            self.selection.all_selected_areas(),
            self.selection.focus().country.as_deref(),
            self.dir,
        );

        // Viewport first: the zoom-to-selection must land before any color
        // or border decisions become visible.
        let bounds = self.package.atlas.bounds_of(&membership.codes);
        self.viewport.fit_selection(&bounds);

        let aggregates = aggregate_by_country(
            &self.package.table.rows,
            self.selection.indicator(),
            &self.selection.selected_years(),
        );
        let scale = LinearScale::from_values(aggregates.values().copied());

        let map = self.layer.extract(
            &self.package.atlas,
            &aggregates,
            &scale,
            &membership,
            self.dir,
            &self.viewport.projection,
        );
        let legend = build_legend(
            self.package
                .catalogue
                .display_name(self.selection.indicator()),
            &scale,
        );

        self.metrics.inc_counter("cycles_run", 1);
        self.metrics
            .set_gauge("features_rendered", map.base.len() as i64);
        self.metrics
            .set_gauge("countries_aggregated", aggregates.len() as i64);

        self.output = RenderOutput {
            map,
            legend,
            scale,
            aggregates,
            membership,
        };
    }

    pub fn hover(&mut self, code: u32, pointer: Vec2) -> Option<TooltipSnapshot> {
        let ctx = HoverContext {
            indicator_name: self
                .package
                .catalogue
                .display_name(self.selection.indicator()),
            interval: self.selection.interval(),
            aggregates: &self.output.aggregates,
            all_selected: self.selection.all_selected_areas(),
            dir: self.dir,
        };
        let tooltip = self.hover.hover(
            &self.package.atlas,
            code,
            pointer,
            &ctx,
            self.cycle,
            &mut self.bus,
        );
        self.tooltip = tooltip.clone();
        tooltip
    }

    pub fn unhover(&mut self) -> Option<StrokeReset> {
        let ctx = HoverContext {
            indicator_name: self
                .package
                .catalogue
                .display_name(self.selection.indicator()),
            interval: self.selection.interval(),
            aggregates: &self.output.aggregates,
            all_selected: self.selection.all_selected_areas(),
            dir: self.dir,
        };
        self.tooltip = None;
        self.hover.unhover(
            &self.layer,
            &self.output.membership,
            &ctx,
            self.cycle,
            &mut self.bus,
        )
    }

    /// Pan the viewport and re-project both path layers; aggregation and
    /// color state are untouched.
    pub fn pan(&mut self, dx_px: f64, dy_px: f64) {
        self.viewport.pan(dx_px, dy_px);
        self.reproject();
    }

    /// Zoom about an anchor and re-project both path layers.
    pub fn zoom(&mut self, factor: f64, anchor_px: Vec2) {
        self.viewport.zoom(factor, anchor_px);
        self.reproject();
    }

    fn reproject(&mut self) {
        self.output.map = self.layer.reproject(
            &self.output.map,
            &self.package.atlas,
            &self.viewport.projection,
        );
    }

    pub fn output(&self) -> &RenderOutput {
        &self.output
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tooltip(&self) -> Option<&TooltipSnapshot> {
        self.tooltip.as_ref()
    }

    pub fn events(&self) -> &[runtime::event_bus::Event] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<runtime::event_bus::Event> {
        self.bus.drain()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn svg(&self) -> String {
        render::svg::render_document(
            self.viewport.size_px,
            &self.output.map,
            &self.output.legend,
            self.tooltip.as_ref(),
        )
    }
}
