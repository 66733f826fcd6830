use directory::Directory;
use runtime::cycle::Cycle;
use runtime::event_bus::{EventBus, Notice};

/// Hard cap on simultaneous comparison areas.
pub const MAX_COMPARISONS: usize = 4;

/// The focused area. Exactly one dimension is active: the country when set,
/// the region otherwise. A set country is always a member of `region`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusArea {
    pub region: String,
    pub country: Option<String>,
}

impl FocusArea {
    /// Display name of the active dimension.
    pub fn label(&self) -> &str {
        self.country.as_deref().unwrap_or(&self.region)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct YearInterval {
    pub min_year: i32,
    pub max_year: i32,
}

impl YearInterval {
    /// The literal ascending year set; aggregation filters against this, not
    /// against the raw bounds.
    pub fn years(&self) -> Vec<i32> {
        (self.min_year..=self.max_year).collect()
    }
}

/// A requested focus change. `None` fields keep the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaRequest {
    pub region: Option<String>,
    pub country: Option<String>,
}

impl AreaRequest {
    pub fn region(name: impl Into<String>) -> Self {
        Self {
            region: Some(name.into()),
            country: None,
        }
    }

    pub fn country(name: impl Into<String>) -> Self {
        Self {
            region: None,
            country: Some(name.into()),
        }
    }
}

/// Owns the focus area, the comparison list, the active indicator, and the
/// active time interval.
///
/// Invariants, enforced by the mutators:
/// - comparison list holds at most [`MAX_COMPARISONS`] entries, no
///   duplicates, and never the focus country or region name;
/// - `all_selected_areas` is `[focus label, ...comparisons]`, rederived on
///   every mutation;
/// - a set focus country belongs to the active region.
///
/// Invalid input keeps the last known good state; the only error surfaced to
/// callers is `TooManyComparisons`, emitted on the event bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    focus: FocusArea,
    comparisons: Vec<String>,
    indicator: String,
    interval: Option<YearInterval>,
    all_selected: Vec<String>,
}

impl SelectionModel {
    /// Session defaults: the world as focus, no comparisons, no interval.
    pub fn new(default_indicator: impl Into<String>) -> Self {
        let mut model = Self {
            focus: FocusArea {
                region: directory::WORLD_REGION.to_string(),
                country: None,
            },
            comparisons: Vec::new(),
            indicator: default_indicator.into(),
            interval: None,
            all_selected: Vec::new(),
        };
        model.rederive();
        model
    }

    pub fn focus(&self) -> &FocusArea {
        &self.focus
    }

    pub fn comparisons(&self) -> &[String] {
        &self.comparisons
    }

    pub fn indicator(&self) -> &str {
        &self.indicator
    }

    pub fn interval(&self) -> Option<YearInterval> {
        self.interval
    }

    /// Focus label first, then the comparison list in order.
    pub fn all_selected_areas(&self) -> &[String] {
        &self.all_selected
    }

    /// The explicit year set for the aggregation stage; empty until an
    /// interval has been set.
    pub fn selected_years(&self) -> Vec<i32> {
        self.interval.map(|i| i.years()).unwrap_or_default()
    }

    pub fn add_comparison(
        &mut self,
        raw: &str,
        dir: &Directory,
        cycle: Cycle,
        bus: &mut EventBus,
    ) {
        let name = dir.sanitize_name(raw);
        if name.is_empty() {
            return;
        }
        if name == self.focus.region || self.focus.country.as_deref() == Some(name.as_str()) {
            return;
        }
        if self.comparisons.len() >= MAX_COMPARISONS {
            bus.emit(cycle, Notice::TooManyComparisons);
            return;
        }
        if self.comparisons.contains(&name) {
            return;
        }

        self.comparisons.push(name);
        self.rederive();
        bus.emit(cycle, Notice::SelectionChanged);
    }

    pub fn remove_comparison(
        &mut self,
        raw: &str,
        dir: &Directory,
        cycle: Cycle,
        bus: &mut EventBus,
    ) {
        let name = dir.sanitize_name(raw);
        let Some(pos) = self.comparisons.iter().position(|c| *c == name) else {
            return;
        };
        self.comparisons.remove(pos);
        self.rederive();
        bus.emit(cycle, Notice::SelectionChanged);
    }

    /// Applies a focus change: region first (kept when absent), then the
    /// country attempt, then mutual-exclusion cleanup of the comparison
    /// list.
    pub fn set_area(
        &mut self,
        request: AreaRequest,
        dir: &Directory,
        cycle: Cycle,
        bus: &mut EventBus,
    ) {
        let before = (self.focus.clone(), self.comparisons.clone());

        if let Some(region) = request.region {
            let region = dir.sanitize_name(&region);
            if !region.is_empty() {
                self.focus.region = region;
            }
        }

        if let Some(country) = request.country {
            self.try_set_country(&country, dir);
        }

        // A focus area and a comparison area are mutually exclusive: confirming
        // an area as focus drops it from the comparison list.
        let region = self.focus.region.clone();
        self.comparisons.retain(|c| *c != region);
        if let Some(country) = self.focus.country.clone() {
            self.comparisons.retain(|c| *c != country);
        }

        if (self.focus.clone(), self.comparisons.clone()) != before {
            self.rederive();
            bus.emit(cycle, Notice::SelectionChanged);
        }
    }

    /// Accepts a country only if it belongs to the currently active region;
    /// anything else keeps the prior country.
    fn try_set_country(&mut self, raw: &str, dir: &Directory) {
        let name = dir.sanitize_name(raw);
        if name.is_empty() {
            return;
        }
        let members = dir.countries_of_region(&self.focus.region);
        if members.iter().any(|m| *m == name) {
            self.focus.country = Some(name);
        }
    }

    /// Replaces the indicator; an empty code is ignored. Codes are not
    /// validated against the catalogue here.
    pub fn set_indicator(&mut self, code: &str, cycle: Cycle, bus: &mut EventBus) {
        if code.is_empty() || code == self.indicator {
            return;
        }
        self.indicator = code.to_string();
        bus.emit(cycle, Notice::SelectionChanged);
    }

    /// Replaces the interval only when both bounds are present and ordered;
    /// partial or inverted updates are rejected as a unit.
    pub fn set_interval(
        &mut self,
        min_year: Option<i32>,
        max_year: Option<i32>,
        cycle: Cycle,
        bus: &mut EventBus,
    ) {
        let (Some(min_year), Some(max_year)) = (min_year, max_year) else {
            return;
        };
        if min_year > max_year {
            return;
        }
        let interval = YearInterval { min_year, max_year };
        if self.interval == Some(interval) {
            return;
        }
        self.interval = Some(interval);
        bus.emit(cycle, Notice::SelectionChanged);
    }

    /// Convenience composition: area, then indicator, then interval.
    pub fn set_items(
        &mut self,
        area: AreaRequest,
        indicator: &str,
        min_year: Option<i32>,
        max_year: Option<i32>,
        dir: &Directory,
        cycle: Cycle,
        bus: &mut EventBus,
    ) {
        self.set_area(area, dir, cycle, bus);
        self.set_indicator(indicator, cycle, bus);
        self.set_interval(min_year, max_year, cycle, bus);
    }

    /// True when any comparison entry refers to the same country as `name`
    /// under the directory's alias equivalence.
    pub fn is_focus_country_in_list(&self, name: &str, dir: &Directory) -> bool {
        self.comparisons
            .iter()
            .any(|c| dir.is_same_country_name(c, name))
    }

    fn rederive(&mut self) {
        self.all_selected.clear();
        self.all_selected.push(self.focus.label().to_string());
        self.all_selected.extend(self.comparisons.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::{AreaRequest, MAX_COMPARISONS, SelectionModel, YearInterval};
    use directory::Directory;
    use runtime::cycle::Cycle;
    use runtime::event_bus::{EventBus, Notice};

    fn fixture() -> (SelectionModel, &'static Directory, Cycle, EventBus) {
        (
            SelectionModel::new("SP.POP.TOTL"),
            Directory::embedded(),
            Cycle::new(0),
            EventBus::new(),
        )
    }

    #[test]
    fn defaults_focus_the_world() {
        let (model, _, _, _) = fixture();
        assert_eq!(model.focus().region, "World");
        assert_eq!(model.focus().country, None);
        assert_eq!(model.all_selected_areas(), ["World"]);
        assert_eq!(model.interval(), None);
        assert!(model.selected_years().is_empty());
    }

    #[test]
    fn comparisons_stay_unique_and_capped() {
        let (mut model, dir, cycle, mut bus) = fixture();
        for name in ["Brazil", "Brazil", "Kenya", "japan", "India", "Chile"] {
            model.add_comparison(name, dir, cycle, &mut bus);
        }

        assert_eq!(model.comparisons().len(), MAX_COMPARISONS);
        assert_eq!(model.comparisons(), ["Brazil", "Kenya", "Japan", "India"]);
        let overflows = bus
            .events()
            .iter()
            .filter(|e| e.notice == Notice::TooManyComparisons)
            .count();
        assert_eq!(overflows, 1);
    }

    #[test]
    fn focus_names_are_rejected_from_comparisons() {
        let (mut model, dir, cycle, mut bus) = fixture();
        model.add_comparison("World", dir, cycle, &mut bus);
        assert!(model.comparisons().is_empty());

        model.set_area(
            AreaRequest {
                region: Some("South Asia".into()),
                country: Some("India".into()),
            },
            dir,
            cycle,
            &mut bus,
        );
        model.add_comparison("India", dir, cycle, &mut bus);
        model.add_comparison("South Asia", dir, cycle, &mut bus);
        assert!(model.comparisons().is_empty());
    }

    #[test]
    fn all_selected_areas_tracks_focus_then_comparisons() {
        let (mut model, dir, cycle, mut bus) = fixture();
        model.add_comparison("Kenya", dir, cycle, &mut bus);
        model.add_comparison("Brazil", dir, cycle, &mut bus);
        assert_eq!(model.all_selected_areas(), ["World", "Kenya", "Brazil"]);
        assert_eq!(
            model.all_selected_areas().len(),
            model.comparisons().len() + 1
        );

        model.set_area(
            AreaRequest {
                region: Some("East Asia & Pacific".into()),
                country: Some("Japan".into()),
            },
            dir,
            cycle,
            &mut bus,
        );
        assert_eq!(model.all_selected_areas(), ["Japan", "Kenya", "Brazil"]);
    }

    #[test]
    fn country_outside_the_active_region_is_ignored() {
        let (mut model, dir, cycle, mut bus) = fixture();
        model.set_area(AreaRequest::region("South Asia"), dir, cycle, &mut bus);
        model.set_area(AreaRequest::country("India"), dir, cycle, &mut bus);
        assert_eq!(model.focus().country.as_deref(), Some("India"));

        // Kenya is Sub-Saharan Africa; the prior country survives.
        model.set_area(AreaRequest::country("Kenya"), dir, cycle, &mut bus);
        assert_eq!(model.focus().country.as_deref(), Some("India"));
    }

    #[test]
    fn confirming_a_listed_region_as_focus_removes_it() {
        let (mut model, dir, cycle, mut bus) = fixture();
        model.add_comparison("South Asia", dir, cycle, &mut bus);
        assert_eq!(model.comparisons(), ["South Asia"]);

        model.set_area(AreaRequest::region("South Asia"), dir, cycle, &mut bus);
        assert!(model.comparisons().is_empty());
        assert_eq!(model.all_selected_areas(), ["South Asia"]);
    }

    #[test]
    fn partial_interval_updates_are_rejected_as_a_unit() {
        let (mut model, _, cycle, mut bus) = fixture();
        model.set_interval(Some(2000), Some(2010), cycle, &mut bus);
        let before = model.interval();

        model.set_interval(Some(1990), None, cycle, &mut bus);
        model.set_interval(None, Some(2020), cycle, &mut bus);
        model.set_interval(Some(2020), Some(2010), cycle, &mut bus);
        assert_eq!(model.interval(), before);
        assert_eq!(
            model.interval(),
            Some(YearInterval {
                min_year: 2000,
                max_year: 2010
            })
        );
    }

    #[test]
    fn interval_expands_to_the_literal_year_set() {
        let (mut model, _, cycle, mut bus) = fixture();
        model.set_interval(Some(2010), Some(2013), cycle, &mut bus);
        assert_eq!(model.selected_years(), vec![2010, 2011, 2012, 2013]);
    }

    #[test]
    fn empty_indicator_keeps_the_previous_one() {
        let (mut model, _, cycle, mut bus) = fixture();
        model.set_indicator("", cycle, &mut bus);
        assert_eq!(model.indicator(), "SP.POP.TOTL");
        model.set_indicator("NY.GDP.MKTP.CD", cycle, &mut bus);
        assert_eq!(model.indicator(), "NY.GDP.MKTP.CD");
    }

    #[test]
    fn set_items_applies_area_indicator_then_interval() {
        let (mut model, dir, cycle, mut bus) = fixture();
        model.set_items(
            AreaRequest {
                region: Some("Sub-Saharan Africa".into()),
                country: Some("Kenya".into()),
            },
            "NY.GDP.MKTP.CD",
            Some(1995),
            Some(2005),
            dir,
            cycle,
            &mut bus,
        );
        assert_eq!(model.focus().country.as_deref(), Some("Kenya"));
        assert_eq!(model.indicator(), "NY.GDP.MKTP.CD");
        assert_eq!(
            model.interval(),
            Some(YearInterval {
                min_year: 1995,
                max_year: 2005
            })
        );
    }

    #[test]
    fn alias_equivalence_finds_listed_countries() {
        let (mut model, dir, cycle, mut bus) = fixture();
        model.add_comparison("Russia", dir, cycle, &mut bus);
        assert!(model.is_focus_country_in_list("Russian Federation", dir));
        assert!(!model.is_focus_country_in_list("Ukraine", dir));
    }

    #[test]
    fn overflow_leaves_state_untouched() {
        let (mut model, dir, cycle, mut bus) = fixture();
        for name in ["Brazil", "Kenya", "Japan", "India"] {
            model.add_comparison(name, dir, cycle, &mut bus);
        }
        let before = model.clone();
        bus.drain();

        model.add_comparison("Chile", dir, cycle, &mut bus);
        assert_eq!(model, before);
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].notice, Notice::TooManyComparisons);
    }

    #[test]
    fn sanitized_names_enter_the_list() {
        let (mut model, dir, cycle, mut bus) = fixture();
        model.add_comparison("  viet   nam ", dir, cycle, &mut bus);
        assert_eq!(model.comparisons(), ["Vietnam"]);

        model.remove_comparison("VIETNAM", dir, cycle, &mut bus);
        assert!(model.comparisons().is_empty());
    }
}
