//! Excel import/export
//!
//! - Import: .xlsx worksheet → row-oriented `SheetTable`
//! - Export: forecast table → single-sheet .xlsx bytes

pub mod dates;
mod exporter;
mod importer;

pub use exporter::{export_to_bytes, ForecastExporter};
pub use importer::{load_sheet, load_sheet_from_bytes, ExcelImporter};
