use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a table from the dataset source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Workbook {} has no worksheets", path.display())]
    NoWorksheet { path: PathBuf },

    #[error("Column '{column}' not found. Available columns: {available}")]
    MissingColumn { column: String, available: String },

    #[error("Dataset must contain at least one data row")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Filter combinations the dashboard refuses to encode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Select at least one company")]
    EmptySelection,

    #[error("Unknown reporting period '{period}'. Available periods: {available}")]
    UnknownPeriod { period: String, available: String },
}
