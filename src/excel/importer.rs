//! Excel importer - reads one worksheet of an .xlsx into a `SheetTable`

use crate::error::{ForecastError, ForecastResult};
use crate::excel::dates::{excel_serial_to_datetime, parse_datetime_text};
use crate::types::{Cell, SheetTable};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Reads a named worksheet from workbook bytes
pub struct ExcelImporter {
    bytes: Vec<u8>,
}

impl ExcelImporter {
    /// Create an importer over an uploaded workbook
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Create an importer by reading a workbook from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> ForecastResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(bytes))
    }

    /// Load a single sheet; header row first, data rows after
    pub fn load_sheet(&self, sheet_name: &str) -> ForecastResult<SheetTable> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(self.bytes.as_slice()))
            .map_err(|e| ForecastError::MalformedFile(format!("Failed to open workbook: {}", e)))?;

        let sheet_names = workbook.sheet_names();
        if !sheet_names.iter().any(|s| s == sheet_name) {
            return Err(ForecastError::SheetNotFound {
                sheet: sheet_name.to_string(),
                available: sheet_names.join(", "),
            });
        }

        let range = workbook.worksheet_range(sheet_name).map_err(|e| {
            ForecastError::MalformedFile(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        let table = self.range_to_table(sheet_name, &range);
        debug!(
            sheet = sheet_name,
            columns = table.headers.len(),
            rows = table.row_count(),
            "loaded worksheet"
        );
        Ok(table)
    }

    fn range_to_table(&self, sheet_name: &str, range: &Range<Data>) -> SheetTable {
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Data::String(s) => s.trim().to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Float(f) => f.to_string(),
                    _ => format!("col_{}", col),
                })
                .collect(),
            None => return SheetTable::new(sheet_name, Vec::new()),
        };

        let mut table = SheetTable::new(sheet_name, headers);
        for row in rows {
            let cells: Vec<Cell> = row.iter().map(convert_cell).collect();
            // Fully blank rows are formatting leftovers, not records
            if cells.iter().all(Cell::is_empty) {
                continue;
            }
            table.add_row(cells);
        }
        table
    }
}

/// Map a calamine cell onto the loader's cell model
fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if dt.is_datetime() {
                excel_serial_to_datetime(serial)
                    .map(Cell::DateTime)
                    .unwrap_or(Cell::Number(serial))
            } else {
                Cell::Number(serial)
            }
        }
        Data::DateTimeIso(s) => parse_datetime_text(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

/// Load `sheet_name` from uploaded workbook bytes
pub fn load_sheet_from_bytes(bytes: &[u8], sheet_name: &str) -> ForecastResult<SheetTable> {
    ExcelImporter::from_bytes(bytes).load_sheet(sheet_name)
}

/// Load `sheet_name` from a workbook on disk
pub fn load_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> ForecastResult<SheetTable> {
    ExcelImporter::from_path(path)?.load_sheet(sheet_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_convert_cell_numbers() {
        assert_eq!(convert_cell(&Data::Int(300)), Cell::Number(300.0));
        assert_eq!(convert_cell(&Data::Float(12.5)), Cell::Number(12.5));
    }

    #[test]
    fn test_convert_cell_text_and_bool() {
        assert_eq!(
            convert_cell(&Data::String("Acme".to_string())),
            Cell::Text("Acme".to_string())
        );
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn test_convert_cell_iso_datetime() {
        let cell = convert_cell(&Data::DateTimeIso("2024-02-03T04:05:06".to_string()));
        match cell {
            Cell::DateTime(dt) => assert_eq!(dt.to_string(), "2024-02-03 04:05:06"),
            other => panic!("Expected DateTime, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_cell_errors_become_empty() {
        assert_eq!(convert_cell(&Data::Error(CellErrorType::NA)), Cell::Empty);
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn test_garbage_bytes_are_malformed() {
        let result = load_sheet_from_bytes(b"definitely not a zip archive", "opportunities");
        assert!(matches!(result, Err(ForecastError::MalformedFile(_))));
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let result = load_sheet("/nonexistent/dir/input.xlsx", "opportunities");
        assert!(matches!(result, Err(ForecastError::Io(_))));
    }
}
