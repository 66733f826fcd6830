use foundation::math::Vec2;
use layers::choropleth::{ChoroplethSnapshot, CountryShape};
use layers::legend::LegendSnapshot;
use layers::tooltip::TooltipSnapshot;

const LEGEND_SWATCH_PX: f64 = 14.0;
const LEGEND_ROW_GAP_PX: f64 = 20.0;
const LEGEND_MARGIN_PX: f64 = 12.0;

/// Serializes one render cycle into a standalone SVG document.
///
/// Layer order is load-bearing: the base pass is written before the emphasis
/// pass so emphasized borders always paint on top, and the emphasis paths
/// carry `fill="none"` so they never composite over a neighbor's fill.
pub fn render_document(
    size_px: [f64; 2],
    map: &ChoroplethSnapshot,
    legend: &LegendSnapshot,
    tooltip: Option<&TooltipSnapshot>,
) -> String {
    let [width, height] = size_px;
    let mut out = String::new();

    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">\n"
    ));

    out.push_str("  <g class=\"base-layer\">\n");
    for shape in &map.base {
        push_shape(&mut out, shape);
    }
    out.push_str("  </g>\n");

    out.push_str("  <g class=\"emphasis-layer\">\n");
    for shape in &map.emphasis {
        push_shape(&mut out, shape);
    }
    out.push_str("  </g>\n");

    push_legend(&mut out, legend, size_px);
    if let Some(tooltip) = tooltip {
        push_tooltip(&mut out, tooltip);
    }

    out.push_str("</svg>\n");
    out
}

/// Ring list to SVG path data: one `M … L … Z` subpath per ring.
pub fn path_data(rings: &[Vec<Vec2>]) -> String {
    let mut out = String::new();
    for ring in rings {
        let mut points = ring.iter().filter(|p| p.is_finite());
        let Some(first) = points.next() else {
            continue;
        };
        out.push_str(&format!("M{},{}", fmt(first.x), fmt(first.y)));
        for p in points {
            out.push_str(&format!("L{},{}", fmt(p.x), fmt(p.y)));
        }
        out.push('Z');
    }
    out
}

pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_shape(out: &mut String, shape: &CountryShape) {
    let d = path_data(&shape.rings);
    let fill = match shape.fill {
        Some(color) => format!("fill=\"{color}\" fill-opacity=\"{}\"", shape.fill_opacity),
        None => "fill=\"none\"".to_string(),
    };
    out.push_str(&format!(
        "    <path data-code=\"{}\" data-name=\"{}\" d=\"{d}\" {fill} stroke=\"{}\" \
         stroke-width=\"{}\"/>\n",
        shape.feature.code,
        escape_text(&shape.feature.name),
        shape.stroke,
        fmt(shape.stroke_width),
    ));
}

fn push_legend(out: &mut String, legend: &LegendSnapshot, size_px: [f64; 2]) {
    let x = LEGEND_MARGIN_PX;
    let mut y = size_px[1] - LEGEND_MARGIN_PX - legend.rows.len() as f64 * LEGEND_ROW_GAP_PX;

    out.push_str("  <g class=\"legend\">\n");
    out.push_str(&format!(
        "    <text x=\"{}\" y=\"{}\" class=\"legend-title\">{}</text>\n",
        fmt(x),
        fmt(y - 6.0),
        escape_text(&legend.title),
    ));
    for row in &legend.rows {
        out.push_str(&format!(
            "    <rect x=\"{}\" y=\"{}\" width=\"{LEGEND_SWATCH_PX}\" \
             height=\"{LEGEND_SWATCH_PX}\" fill=\"{}\"/>\n",
            fmt(x),
            fmt(y),
            row.swatch,
        ));
        out.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\">{}</text>\n",
            fmt(x + LEGEND_SWATCH_PX + 6.0),
            fmt(y + LEGEND_SWATCH_PX - 3.0),
            escape_text(&row.label),
        ));
        y += LEGEND_ROW_GAP_PX;
    }
    out.push_str("  </g>\n");
}

fn push_tooltip(out: &mut String, tooltip: &TooltipSnapshot) {
    let x = tooltip.position.x + 12.0;
    let y = tooltip.position.y + 12.0;

    out.push_str(&format!(
        "  <g class=\"tooltip\" transform=\"translate({},{})\">\n",
        fmt(x),
        fmt(y)
    ));
    let mut line_y = 14.0;
    for line in [
        tooltip.country.as_str(),
        tooltip.years.as_str(),
        tooltip.indicator.as_str(),
        tooltip.value.as_str(),
    ] {
        if line.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "    <text x=\"6\" y=\"{}\">{}</text>\n",
            fmt(line_y),
            escape_text(line),
        ));
        line_y += 16.0;
    }
    out.push_str("  </g>\n");
}

/// Coordinates rounded to 0.01 px keep documents compact and diffs stable.
fn fmt(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded.trunc() as i64)
    } else {
        format!("{rounded}")
    }
}
