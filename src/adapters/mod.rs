// Adapters layer: concrete implementations for external systems (workbook files, export formats).

pub mod export;
pub mod workbook_reader;

pub use export::{ExportFile, OutputFormat};
pub use workbook_reader::{read_workbook, read_workbook_file};
