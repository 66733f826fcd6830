use std::collections::{BTreeMap, BTreeSet};

use model::Observation;

use crate::statistics::Statistics;

/// Aggregate entry representing the whole world rather than a single
/// country. Dropped after aggregation: the render surface has no geometry
/// for it.
pub const WORLD_AGGREGATE_CODE: &str = "WLD";

/// Per-country means, keyed by alpha-3 code.
///
/// A country with no matching observation has no entry; "missing" and "zero"
/// are distinct categories everywhere downstream.
pub type AggregatedValues = BTreeMap<String, f64>;

/// Filters `rows` to the active indicator and the explicit year set, groups
/// by country, and reduces each group to its arithmetic mean.
///
/// The whole mapping is recomputed on every render cycle; the observation
/// sets in play are small enough that full recomputation stays simpler than
/// incremental maintenance.
pub fn aggregate_by_country(
    rows: &[Observation],
    indicator: &str,
    years: &[i32],
) -> AggregatedValues {
    let year_set: BTreeSet<i32> = years.iter().copied().collect();

    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if row.indicator != indicator || !year_set.contains(&row.year) {
            continue;
        }
        grouped
            .entry(row.country_code.as_str())
            .or_default()
            .push(row.value);
    }

    let mut out = AggregatedValues::new();
    for (code, values) in grouped {
        if code == WORLD_AGGREGATE_CODE {
            continue;
        }
        if let Some(mean) = Statistics::mean(&values) {
            out.insert(code.to_string(), mean);
        }
    }
    out
}
