/// Placeholder shown wherever a value has no data behind it.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a value with an SI-style magnitude suffix (`k`, `M`, `B`, `T`).
///
/// The giga suffix is rendered as `B` for "billion" rather than the SI `G`,
/// matching how the dashboard labels population- and currency-like values.
/// Non-finite input formats as [`NOT_AVAILABLE`].
pub fn format_magnitude(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let abs = value.abs();
    if abs >= 1.0e12 {
        return format_scaled(value / 1.0e12, "T");
    }
    if abs >= 1.0e9 {
        return format_scaled(value / 1.0e9, "B");
    }
    if abs >= 1.0e6 {
        return format_scaled(value / 1.0e6, "M");
    }
    if abs >= 1.0e3 {
        return format_scaled(value / 1.0e3, "k");
    }
    format_scaled(value, "")
}

/// One decimal place, with a trailing `.0` dropped.
fn format_scaled(scaled: f64, suffix: &str) -> String {
    let rounded = (scaled * 10.0).round() / 10.0;
    if rounded == rounded.trunc() {
        format!("{}{suffix}", rounded.trunc() as i64)
    } else {
        format!("{rounded:.1}{suffix}")
    }
}
