// Detail table: the filtered rows with metrics formatted for display

use crate::config::ColumnMapping;
use crate::ir::{DetailRow, Table};
use crate::transform;
use std::collections::HashSet;

pub const MISSING: &str = "N/A";

/// Fraction rendered as a percentage with two decimals, e.g. 0.1234 -> "12.34%"
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => MISSING.to_string(),
    }
}

pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3}", v),
        None => MISSING.to_string(),
    }
}

/// Rows matching the filter. Unlike the chart, incomplete rows are kept.
pub fn detail_rows(table: &Table, period: &str, selected_entities: &HashSet<String>) -> Vec<DetailRow> {
    transform::select_rows(table, period, selected_entities)
        .into_iter()
        .map(|r| DetailRow {
            entity_name: r.entity_name.clone(),
            period: r.period.clone(),
            net_profit_margin: format_percent(r.net_profit_margin),
            asset_turnover: format_ratio(r.asset_turnover.as_number()),
            return_on_assets: format_percent(r.return_on_assets),
        })
        .collect()
}

/// Lay the rows out as an aligned plain-text table
pub fn render_text_table(rows: &[DetailRow], columns: &ColumnMapping) -> String {
    let headers = [
        columns.entity_name.as_str(),
        columns.period.as_str(),
        columns.net_profit_margin.as_str(),
        columns.asset_turnover.as_str(),
        columns.return_on_assets.as_str(),
    ];
    let cells: Vec<[&str; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.entity_name.as_str(),
                r.period.as_str(),
                r.net_profit_margin.as_str(),
                r.asset_turnover.as_str(),
                r.return_on_assets.as_str(),
            ]
        })
        .collect();

    let mut widths = headers.map(display_width);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| {
            let pad = width - display_width(cell);
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

/// Terminal column width; CJK ideographs and fullwidth forms take two columns
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60 | 0xFFE0..=0xFFE6 => 2,
            _ => 1,
        })
        .sum()
}
