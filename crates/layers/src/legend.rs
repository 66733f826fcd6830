use compute::bins::ValueBin;
use compute::scale::LinearScale;
use foundation::format::{NOT_AVAILABLE, format_magnitude};

use crate::symbology::fill_for;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub bin: ValueBin,
    pub swatch: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSnapshot {
    /// Display name of the active indicator.
    pub title: String,
    /// Highest bin first, the missing bin last.
    pub rows: Vec<LegendRow>,
}

/// Builds the legend for the current cycle: one swatch per value bin labeled
/// with the inverse-scaled lower bound, plus the missing bin labeled "N/A".
pub fn build_legend(title: impl Into<String>, scale: &LinearScale) -> LegendSnapshot {
    let rows = ValueBin::ALL
        .iter()
        .map(|bin| LegendRow {
            bin: *bin,
            swatch: fill_for(*bin),
            label: match bin.lower_bound() {
                Some(t) => format_magnitude(scale.invert(t)),
                None => NOT_AVAILABLE.to_string(),
            },
        })
        .collect();

    LegendSnapshot {
        title: title.into(),
        rows,
    }
}
