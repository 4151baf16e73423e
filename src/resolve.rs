use crate::config::ColumnMapping;
use crate::error::LoadError;
use crate::ir::{Record, Table};
use crate::loader::SheetData;

/// Column indices of the required fields within a loaded sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub entity_name: usize,
    pub period: usize,
    pub net_profit_margin: usize,
    pub asset_turnover: usize,
    pub return_on_assets: usize,
}

/// Resolve the configured header names against the sheet headers
pub fn resolve_columns(mapping: &ColumnMapping, sheet: &SheetData) -> Result<ResolvedColumns, LoadError> {
    Ok(ResolvedColumns {
        entity_name: sheet.find_column(&mapping.entity_name)?,
        period: sheet.find_column(&mapping.period)?,
        net_profit_margin: sheet.find_column(&mapping.net_profit_margin)?,
        asset_turnover: sheet.find_column(&mapping.asset_turnover)?,
        return_on_assets: sheet.find_column(&mapping.return_on_assets)?,
    })
}

/// Build raw records from a sheet. Metric cells are copied as loaded;
/// names and periods become text, so a numeric period 20241231 reads "20241231".
pub fn build_table(mapping: &ColumnMapping, sheet: &SheetData) -> Result<Table, LoadError> {
    let columns = resolve_columns(mapping, sheet)?;

    let records = (0..sheet.rows.len())
        .map(|row| {
            Record::raw(
                sheet.cell(row, columns.entity_name).to_text(),
                sheet.cell(row, columns.period).to_text(),
                sheet.cell(row, columns.net_profit_margin).clone(),
                sheet.cell(row, columns.asset_turnover).clone(),
                sheet.cell(row, columns.return_on_assets).clone(),
            )
        })
        .collect();

    Ok(Table::new(records))
}
