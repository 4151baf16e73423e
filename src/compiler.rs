use crate::config::ChartLabels;
use crate::ir::{ChartLayout, ChartOutcome, ChartPoint, ChartSpec, Table};
use crate::palette::{self, ColorGradient};
use crate::scale::{ColorScale, MinMax};
use crate::transform::{self, PlotRow};
use std::collections::HashSet;

/// Encode the rows of one period and entity selection as a bubble chart.
///
/// Rows missing any plotted metric are dropped. An empty selection, an
/// unmatched period, or a filter whose rows are all incomplete gives
/// `ChartOutcome::NoData`.
pub fn encode(
    table: &Table,
    period: &str,
    selected_entities: &HashSet<String>,
    labels: &ChartLabels,
) -> ChartOutcome {
    let selected = transform::select_rows(table, period, selected_entities);
    let rows = transform::complete_rows(&selected);

    let Some(bounds) = MinMax::of(rows.iter().map(|r| r.return_on_assets)) else {
        log::info!("No chartable rows for period {}", period);
        return ChartOutcome::NoData;
    };

    let color_scale = ColorScale::new(bounds);
    let gradient = ColorGradient::blue_to_red();

    let points = rows
        .iter()
        .map(|row| compile_point(row, &color_scale, &gradient, labels))
        .collect::<Vec<_>>();

    log::debug!(
        "Encoded {} points for period {} (return on assets {}..{})",
        points.len(),
        period,
        bounds.min,
        bounds.max
    );

    ChartOutcome::Chart(ChartSpec {
        title: format!("{} {}", labels.title, period),
        period: period.to_string(),
        x_axis_title: labels.x_axis.clone(),
        y_axis_title: labels.y_axis.clone(),
        points,
        layout: ChartLayout::default(),
    })
}

fn compile_point(
    row: &PlotRow<'_>,
    color_scale: &ColorScale,
    gradient: &ColorGradient,
    labels: &ChartLabels,
) -> ChartPoint {
    let size = palette::bubble_size(row.return_on_assets);
    let color_value = color_scale.normalize(row.return_on_assets);
    let color = gradient.marker_color(Some(color_value));
    let label = palette::marker_label(row.entity_name, size);
    let y = row.net_profit_margin * 100.0;

    ChartPoint {
        entity_name: row.entity_name.to_string(),
        x: row.asset_turnover,
        y,
        return_on_assets: row.return_on_assets,
        size,
        color_value,
        fill: color.fill,
        border: color.border,
        label: label.text,
        font_size: label.font_size,
        hover_text: hover_text(row, y, labels),
    }
}

/// Hover text always carries the full, untruncated entity name
fn hover_text(row: &PlotRow<'_>, y: f64, labels: &ChartLabels) -> String {
    format!(
        "{}\n{}: {:.3}\n{}: {:.2}%\n{}: {}",
        row.entity_name,
        labels.x_axis,
        row.asset_turnover,
        labels.margin_metric,
        y,
        labels.size_metric,
        format_rounded(row.return_on_assets, 4)
    )
}

/// Round to `digits` decimals and print the shortest form, keeping at least
/// one decimal place: 0.05 -> "0.05", 0.0 -> "0.0", 0.123456 -> "0.1235"
fn format_rounded(value: f64, digits: i32) -> String {
    let factor = 10f64.powi(digits);
    let rounded = (value * factor).round() / factor;
    let text = rounded.to_string();
    if rounded.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}
