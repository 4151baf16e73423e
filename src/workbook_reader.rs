use crate::error::LoadError;
use crate::ir::Cell;
use crate::loader::SheetData;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Read the first worksheet of an xlsx/xls/ods workbook.
///
/// The first row holds the headers. Numeric cells stay numbers; rows with
/// no values at all are skipped.
pub fn read_workbook_from_path(path: &Path) -> Result<SheetData, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let workbook_error = |source| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::NoWorksheet {
            path: path.to_path_buf(),
        })?;
    log::debug!("Reading worksheet '{}' of {}", sheet_name, path.display());

    let range = workbook.worksheet_range(&sheet_name).map_err(workbook_error)?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Err(LoadError::Empty),
    };

    let rows: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(to_cell).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| *cell != Cell::Missing))
        .collect();

    if rows.is_empty() {
        return Err(LoadError::Empty);
    }

    Ok(SheetData { headers, rows })
}

fn header_text(data: &Data) -> String {
    to_cell(data).to_text().trim().to_string()
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::from_text(s),
        Data::Empty | Data::Error(_) => Cell::Missing,
        other => Cell::from_text(&other.to_string()),
    }
}
