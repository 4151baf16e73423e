// Dataset files: pick a reader by extension and expose one sheet of cells

use crate::csv_reader::{self, CsvData};
use crate::error::LoadError;
use crate::ir::Cell;
use crate::workbook_reader;
use std::path::Path;

static MISSING_CELL: Cell = Cell::Missing;

/// Header row plus data rows, whichever file format they came from
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetData {
    /// Cell at (row, column); cells past the end of a short row are missing
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&MISSING_CELL)
    }

    /// Locate a header by exact name, falling back to an ASCII case-insensitive match
    pub fn find_column(&self, name: &str) -> Result<usize, LoadError> {
        let name = name.trim();
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| self.headers.iter().position(|h| h.eq_ignore_ascii_case(name)))
            .ok_or_else(|| LoadError::MissingColumn {
                column: name.to_string(),
                available: self.headers.join(", "),
            })
    }
}

impl From<CsvData> for SheetData {
    fn from(data: CsvData) -> Self {
        SheetData {
            headers: data.headers,
            rows: data
                .rows
                .iter()
                .map(|row| row.iter().map(|text| Cell::from_text(text)).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Workbook,
}

impl FileFormat {
    /// Spreadsheet extensions open as workbooks; anything else is read as CSV
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods") => FileFormat::Workbook,
            _ => FileFormat::Csv,
        }
    }
}

pub fn load_sheet(path: &Path) -> Result<SheetData, LoadError> {
    let format = FileFormat::from_path(path);
    log::debug!("Reading {} as {:?}", path.display(), format);
    match format {
        FileFormat::Csv => csv_reader::read_csv_from_path(path).map(SheetData::from),
        FileFormat::Workbook => workbook_reader::read_workbook_from_path(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(headers: &[&str]) -> SheetData {
        SheetData {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: vec![vec![Cell::Text("A".to_string()), Cell::Number(1.0)]],
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("roa.xlsx")), FileFormat::Workbook);
        assert_eq!(FileFormat::from_path(Path::new("ROA.XLS")), FileFormat::Workbook);
        assert_eq!(FileFormat::from_path(Path::new("roa.csv")), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("roa")), FileFormat::Csv);
    }

    #[test]
    fn test_from_csv_data_marks_blanks_missing() {
        let data = CsvData {
            headers: vec!["name".to_string(), "roa".to_string()],
            rows: vec![vec!["森马服饰".to_string(), " ".to_string()]],
        };
        let sheet = SheetData::from(data);
        assert_eq!(sheet.cell(0, 0), &Cell::Text("森马服饰".to_string()));
        assert_eq!(sheet.cell(0, 1), &Cell::Missing);
        assert_eq!(sheet.cell(0, 7), &Cell::Missing);
    }

    #[test]
    fn test_find_column_exact_and_case_insensitive() {
        let sheet = sheet(&["Name", "Period"]);
        assert_eq!(sheet.find_column("Period").unwrap(), 1);
        assert_eq!(sheet.find_column("name").unwrap(), 0);
        assert_eq!(sheet.find_column(" Period ").unwrap(), 1);
    }

    #[test]
    fn test_find_column_not_found() {
        let err = sheet(&["x", "y"]).find_column("roa").unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("x, y"));
    }

    #[test]
    fn test_load_sheet_missing_workbook() {
        let result = load_sheet(Path::new("no/such/dataset.xlsx"));
        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }
}
