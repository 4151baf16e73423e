use crate::ir::{Cell, Record, Table};
use std::collections::HashSet;

/// Coerce raw cells into numbers and derive the fraction fields.
///
/// Cells that cannot be parsed become `Cell::Missing`; rows are never dropped.
/// Running it again on its own output is a no-op.
pub fn normalize(table: Table) -> Table {
    let mut coerced = 0usize;
    let records = table
        .records
        .into_iter()
        .map(|record| {
            let normalized = normalize_record(record);
            coerced += count_missing(&normalized);
            normalized
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Normalized {} rows ({} metric cells missing or unparsable)",
        records.len(),
        coerced
    );
    Table::new(records)
}

fn normalize_record(record: Record) -> Record {
    let net_profit_margin_raw = coerce_numeric(record.net_profit_margin_raw);
    let return_on_assets_raw = coerce_numeric(record.return_on_assets_raw);

    Record {
        net_profit_margin: net_profit_margin_raw.as_number().map(percent_to_fraction),
        return_on_assets: return_on_assets_raw.as_number().map(percent_to_fraction),
        asset_turnover: coerce_numeric(record.asset_turnover),
        net_profit_margin_raw,
        return_on_assets_raw,
        entity_name: record.entity_name,
        period: record.period,
    }
}

fn count_missing(record: &Record) -> usize {
    [
        &record.net_profit_margin_raw,
        &record.asset_turnover,
        &record.return_on_assets_raw,
    ]
    .iter()
    .filter(|c| matches!(c, Cell::Missing))
    .count()
}

fn percent_to_fraction(value: f64) -> f64 {
    value / 100.0
}

/// Parse a cell as a finite number. Anything else, `7.25%` included, is missing.
pub fn coerce_numeric(cell: Cell) -> Cell {
    match cell {
        Cell::Number(v) if v.is_finite() => Cell::Number(v),
        Cell::Number(_) | Cell::Missing => Cell::Missing,
        Cell::Text(text) => {
            match text.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Cell::Number(v),
                _ => Cell::Missing,
            }
        }
    }
}

/// Rows of `period` whose entity is in the selection, in table order
pub fn select_rows<'a>(
    table: &'a Table,
    period: &str,
    selected_entities: &HashSet<String>,
) -> Vec<&'a Record> {
    table
        .records
        .iter()
        .filter(|r| r.period == period && selected_entities.contains(&r.entity_name))
        .collect()
}

/// A row the chart can plot: every plotted metric is present
#[derive(Debug, Clone, PartialEq)]
pub struct PlotRow<'a> {
    pub entity_name: &'a str,
    pub asset_turnover: f64,
    pub net_profit_margin: f64,
    pub return_on_assets: f64,
}

/// Drop rows missing any plotted metric
pub fn complete_rows<'a>(rows: &[&'a Record]) -> Vec<PlotRow<'a>> {
    let plot_rows: Vec<PlotRow<'a>> = rows
        .iter()
        .copied()
        .filter_map(|r| {
            Some(PlotRow {
                entity_name: &r.entity_name,
                asset_turnover: r.asset_turnover.as_number()?,
                net_profit_margin: r.net_profit_margin?,
                return_on_assets: r.return_on_assets?,
            })
        })
        .collect();

    let dropped = rows.len() - plot_rows.len();
    if dropped > 0 {
        log::info!("Dropped {} rows with missing metrics from the chart", dropped);
    }
    plot_rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn raw(name: &str, period: &str, npm: Cell, at: Cell, roa: Cell) -> Record {
        Record::raw(name, period, npm, at, roa)
    }

    fn selection(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric(text("12.5")), Cell::Number(12.5));
        assert_eq!(coerce_numeric(text(" -3 ")), Cell::Number(-3.0));
        assert_eq!(coerce_numeric(text("7.25%")), Cell::Missing);
        assert_eq!(coerce_numeric(text("--")), Cell::Missing);
        assert_eq!(coerce_numeric(text("NaN")), Cell::Missing);
        assert_eq!(coerce_numeric(Cell::Number(f64::INFINITY)), Cell::Missing);
        assert_eq!(coerce_numeric(Cell::Number(0.5)), Cell::Number(0.5));
        assert_eq!(coerce_numeric(Cell::Missing), Cell::Missing);
    }

    #[test]
    fn test_normalize_derives_fractions() {
        let table = Table::new(vec![raw("A", "P1", text("12.5"), text("0.8"), text("4"))]);
        let out = normalize(table);
        let r = &out.records[0];
        assert_eq!(r.net_profit_margin_raw, Cell::Number(12.5));
        assert_eq!(r.net_profit_margin, Some(12.5 / 100.0));
        assert_eq!(r.asset_turnover, Cell::Number(0.8));
        assert_eq!(r.return_on_assets_raw, Cell::Number(4.0));
        assert_eq!(r.return_on_assets, Some(0.04));
    }

    #[test]
    fn test_normalize_fraction_matches_raw_for_every_row() {
        let raws = ["0", "1", "-2.75", "33.3", "100", "0.01", "n/a", ""];
        let table = Table::new(
            raws.iter()
                .map(|v| raw("A", "P1", Cell::from_text(v), Cell::Missing, Cell::from_text(v)))
                .collect(),
        );
        for r in &normalize(table).records {
            match r.net_profit_margin_raw.as_number() {
                Some(v) => assert_eq!(r.net_profit_margin, Some(v / 100.0)),
                None => assert_eq!(r.net_profit_margin, None),
            }
            match r.return_on_assets_raw.as_number() {
                Some(v) => assert_eq!(r.return_on_assets, Some(v / 100.0)),
                None => assert_eq!(r.return_on_assets, None),
            }
        }
    }

    #[test]
    fn test_normalize_unparsable_is_missing_not_zero() {
        let table = Table::new(vec![raw("A", "P1", text("--"), text("abc"), Cell::Missing)]);
        let r = &normalize(table).records[0];
        assert_eq!(r.net_profit_margin_raw, Cell::Missing);
        assert_eq!(r.net_profit_margin, None);
        assert_eq!(r.asset_turnover, Cell::Missing);
        assert_eq!(r.return_on_assets, None);
    }

    #[test]
    fn test_normalize_is_idempotent_and_keeps_rows() {
        let table = Table::new(vec![
            raw("A", "20241231", text("10"), text("1.2"), text("5")),
            raw("B", "20241231", text("x"), Cell::Missing, text("")),
            raw("C", "20231231", Cell::Missing, Cell::Missing, Cell::Missing),
        ]);
        let once = normalize(table);
        assert_eq!(once.len(), 3);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_keeps_period_text() {
        let table = Table::new(vec![raw("A", "20241231", Cell::Missing, Cell::Missing, Cell::Missing)]);
        assert_eq!(normalize(table).records[0].period, "20241231");
    }

    #[test]
    fn test_select_rows_by_period_and_entity() {
        let table = normalize(Table::new(vec![
            raw("A", "P1", text("1"), text("1"), text("1")),
            raw("B", "P1", text("1"), text("1"), text("1")),
            raw("A", "P2", text("1"), text("1"), text("1")),
        ]));
        let rows = select_rows(&table, "P1", &selection(&["A"]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity_name, "A");
        assert_eq!(rows[0].period, "P1");

        assert!(select_rows(&table, "P1", &selection(&[])).is_empty());
        assert!(select_rows(&table, "P3", &selection(&["A", "B"])).is_empty());
    }

    #[test]
    fn test_complete_rows_drops_missing_metrics() {
        let table = normalize(Table::new(vec![
            raw("A", "P1", text("10"), Cell::Missing, text("1")),
            raw("B", "P1", text("10"), text("0.5"), text("2")),
            raw("C", "P1", Cell::Missing, text("0.5"), text("2")),
            raw("D", "P1", text("10"), text("0.5"), text("bad")),
        ]));
        let rows = select_rows(&table, "P1", &selection(&["A", "B", "C", "D"]));
        let plot = complete_rows(&rows);
        assert_eq!(plot.len(), 1);
        assert_eq!(plot[0].entity_name, "B");
        assert_eq!(plot[0].asset_turnover, 0.5);
        assert_eq!(plot[0].net_profit_margin, 0.1);
        assert_eq!(plot[0].return_on_assets, 0.02);
    }
}
