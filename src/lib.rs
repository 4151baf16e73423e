// Library exports for apparelviz

pub mod cache;
pub mod config;
pub mod csv_reader;
pub mod error;
pub mod graph;
pub mod loader;
pub mod palette;
pub mod report;
pub mod runtime;
pub mod workbook_reader;

// Data preparation and chart encoding pipeline
pub mod ir;
pub mod resolve;
pub mod transform;
pub mod scale;
pub mod compiler;
