use crate::config::ColumnMapping;
use crate::error::LoadError;
use crate::ir::Table;
use crate::loader;
use crate::resolve;
use crate::transform;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Where the raw dataset comes from
pub trait DatasetSource {
    fn load(&self) -> Result<Table, LoadError>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// A CSV file or spreadsheet workbook at a fixed path
pub struct FileSource {
    path: PathBuf,
    columns: ColumnMapping,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnMapping) -> Self {
        FileSource {
            path: path.into(),
            columns,
        }
    }
}

impl DatasetSource for FileSource {
    fn load(&self) -> Result<Table, LoadError> {
        let sheet = loader::load_sheet(&self.path)?;
        resolve::build_table(&self.columns, &sheet)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An already-built table, for embedding and tests
pub struct MemorySource {
    table: Table,
}

impl MemorySource {
    pub fn new(table: Table) -> Self {
        MemorySource { table }
    }
}

impl DatasetSource for MemorySource {
    fn load(&self) -> Result<Table, LoadError> {
        Ok(self.table.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory table ({} rows)", self.table.len())
    }
}

/// Load-once cache of the normalized table.
///
/// The first `get` loads and normalizes; later calls share the same
/// `Arc<Table>`. Failed loads are not cached. `reload` is the only way to
/// pick up a changed source.
pub struct DatasetCache<S: DatasetSource> {
    source: S,
    slot: RwLock<Option<Arc<Table>>>,
}

impl<S: DatasetSource> DatasetCache<S> {
    pub fn new(source: S) -> Self {
        DatasetCache {
            source,
            slot: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn get(&self) -> Result<Arc<Table>, LoadError> {
        if let Some(table) = self.slot.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            log::trace!("Dataset cache hit");
            return Ok(Arc::clone(table));
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have filled the slot while we waited
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }
        let table = self.load_normalized()?;
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Drop the cached table and load it again
    pub fn reload(&self) -> Result<Arc<Table>, LoadError> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        let table = self.load_normalized()?;
        *slot = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Forget the cached table; the next `get` loads from the source
    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    fn load_normalized(&self) -> Result<Arc<Table>, LoadError> {
        log::info!("Loading dataset from {}", self.source.describe());
        let table = self.source.load().map_err(|e| {
            log::error!("Dataset load failed: {}", e);
            e
        })?;
        let table = transform::normalize(table);
        log::info!(
            "Loaded {} rows ({} periods, {} companies)",
            table.len(),
            table.periods().len(),
            table.entities().len()
        );
        Ok(Arc::new(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Cell, Record};
    use std::cell::Cell as Counter;
    use std::io::Write;

    struct CountingSource {
        loads: Counter<usize>,
        fail: Counter<bool>,
    }

    impl DatasetSource for CountingSource {
        fn load(&self) -> Result<Table, LoadError> {
            self.loads.set(self.loads.get() + 1);
            if self.fail.get() {
                return Err(LoadError::Empty);
            }
            Ok(Table::new(vec![Record::raw(
                "A",
                "P1",
                Cell::from_text("10"),
                Cell::from_text("1"),
                Cell::from_text(&self.loads.get().to_string()),
            )]))
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    fn counting(fail: bool) -> CountingSource {
        CountingSource {
            loads: Counter::new(0),
            fail: Counter::new(fail),
        }
    }

    #[test]
    fn test_get_loads_once_and_normalizes() {
        let cache = DatasetCache::new(counting(false));
        assert!(!cache.is_loaded());

        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().loads.get(), 1);
        assert_eq!(first.records[0].net_profit_margin, Some(0.1));
        assert!(cache.is_loaded());
    }

    #[test]
    fn test_reload_picks_up_new_data() {
        let cache = DatasetCache::new(counting(false));
        let first = cache.get().unwrap();
        let reloaded = cache.reload().unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(cache.source().loads.get(), 2);
        assert_eq!(reloaded.records[0].return_on_assets, Some(0.02));
    }

    #[test]
    fn test_invalidate_forces_next_load() {
        let cache = DatasetCache::new(counting(false));
        cache.get().unwrap();
        cache.invalidate();
        assert!(!cache.is_loaded());
        cache.get().unwrap();
        assert_eq!(cache.source().loads.get(), 2);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache = DatasetCache::new(counting(true));
        assert!(matches!(cache.get(), Err(LoadError::Empty)));
        assert!(!cache.is_loaded());

        cache.source().fail.set(false);
        assert!(cache.get().is_ok());
        assert_eq!(cache.source().loads.get(), 2);
    }

    #[test]
    fn test_memory_source() {
        let table = Table::new(vec![Record::raw(
            "A",
            "P1",
            Cell::from_text("5"),
            Cell::from_text("0.5"),
            Cell::from_text("1"),
        )]);
        let cache = DatasetCache::new(MemorySource::new(table));
        let loaded = cache.get().unwrap();
        assert_eq!(loaded.records[0].return_on_assets, Some(0.01));
    }

    #[test]
    fn test_file_source_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "股票名称,报告期,销售净利率,总资产周转率,总资产净利率").unwrap();
        writeln!(file, "森马服饰,20241231,8.5,0.72,5.1").unwrap();
        writeln!(file, "海澜之家,20241231,--,0.65,").unwrap();

        let cache = DatasetCache::new(FileSource::new(file.path(), ColumnMapping::default()));
        let table = cache.get().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].net_profit_margin, Some(0.085));
        assert_eq!(table.records[1].net_profit_margin, None);
        assert_eq!(table.records[1].return_on_assets, None);
    }

    #[test]
    fn test_file_source_missing_file() {
        let cache = DatasetCache::new(FileSource::new(
            "no/such/file.csv",
            ColumnMapping::default(),
        ));
        let err = cache.get().unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn test_file_source_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roa.xlsx");
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = ["股票名称", "报告期", "销售净利率", "总资产周转率", "总资产净利率"];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_string(1, 0, "森马服饰").unwrap();
        sheet.write_number(1, 1, 20241231.0).unwrap();
        sheet.write_number(1, 2, 8.5).unwrap();
        sheet.write_number(1, 3, 0.72).unwrap();
        sheet.write_number(1, 4, 5.0).unwrap();
        workbook.save(&path).unwrap();

        let cache = DatasetCache::new(FileSource::new(&path, ColumnMapping::default()));
        let table = cache.get().unwrap();
        assert_eq!(table.periods(), vec!["20241231"]);
        assert_eq!(table.records[0].net_profit_margin, Some(0.085));
        assert_eq!(table.records[0].return_on_assets, Some(0.05));
        assert_eq!(table.records[0].asset_turnover, Cell::Number(0.72));
    }
}
