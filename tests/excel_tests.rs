//! Excel import/export tests

mod common;

use common::*;
use opportunity_forecast::config::ForecastConfig;
use opportunity_forecast::excel::{export_to_bytes, load_sheet, load_sheet_from_bytes, ForecastExporter};
use opportunity_forecast::pipeline::forecast_from_bytes;
use opportunity_forecast::schema::{EXPORT_SHEET, OUTPUT_COLUMNS, REQUIRED_COLUMNS};
use opportunity_forecast::types::{Cell, ForecastTable};
use opportunity_forecast::ForecastError;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sample_forecast() -> ForecastTable {
    let bytes = opportunities_workbook(&[
        SourceRow::new("Acme", "Deal1", 100.0, date(2024, 1, 3)),
        SourceRow::new("Acme", "Deal1", 50.0, date(2024, 1, 20)),
        SourceRow::new("Beta", "Renewal", 400.5, date(2024, 2, 15)).updated(days_ago(20)),
        SourceRow::new("Gamma", "Pilot", 60.0, date(2025, 1, 31)).updated(DateCell::Empty),
    ]);
    let config = ForecastConfig::default().with_reference_time(reference_time());
    forecast_from_bytes(&bytes, &config).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_load_sheet_reads_headers_and_rows() {
    let bytes = opportunities_workbook(&[
        SourceRow::new("Acme", "Deal1", 100.0, date(2024, 1, 3)),
        SourceRow::new("Beta", "Deal2", 5.0, text("N/A")),
    ]);
    let sheet = load_sheet_from_bytes(&bytes, "opportunities").unwrap();

    let expected: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    assert_eq!(sheet.headers, expected);
    assert_eq!(sheet.row_count(), 2);
    assert_eq!(sheet.cell(0, 0), &Cell::Text("Acme".to_string()));
    assert_eq!(sheet.cell(0, 3), &Cell::Number(100.0));
    assert!(matches!(sheet.cell(0, 4), Cell::DateTime(_)));
    assert_eq!(sheet.cell(1, 4), &Cell::Text("N/A".to_string()));
}

#[test]
fn test_load_sheet_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pipeline.xlsx");
    std::fs::write(&path, opportunities_workbook(&[])).unwrap();

    let sheet = load_sheet(&path, "opportunities").unwrap();
    assert_eq!(sheet.headers.len(), REQUIRED_COLUMNS.len());
    assert_eq!(sheet.row_count(), 0);
}

#[test]
fn test_load_missing_sheet_lists_available() {
    let bytes = workbook_with("Pipeline", &REQUIRED_COLUMNS, &[]);
    let err = load_sheet_from_bytes(&bytes, "opportunities").unwrap_err();
    assert!(matches!(err, ForecastError::SheetNotFound { .. }));
    assert!(err.to_string().contains("Pipeline"));
    assert!(err.is_input_error());
}

#[test]
fn test_load_garbage_is_malformed() {
    let err = load_sheet_from_bytes(&[0u8; 64], "opportunities").unwrap_err();
    assert!(matches!(err, ForecastError::MalformedFile(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORTER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_layout_has_index_then_ordered_columns() {
    let table = sample_forecast();
    let bytes = export_to_bytes(&table).unwrap();
    let sheet = load_sheet_from_bytes(&bytes, EXPORT_SHEET).unwrap();

    let mut expected: Vec<String> = OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect();
    expected.extend(["2024-01", "2024-02", "2025-01"].iter().map(|m| m.to_string()));
    assert_eq!(sheet.headers[1..].to_vec(), expected);

    // Column A carries the 0-based row index
    for (idx, _) in table.rows.iter().enumerate() {
        assert_eq!(sheet.cell(idx, 0), &Cell::Number(idx as f64));
    }
}

#[test]
fn test_export_then_reload_reproduces_values() {
    let table = sample_forecast();
    let bytes = export_to_bytes(&table).unwrap();
    let sheet = load_sheet_from_bytes(&bytes, EXPORT_SHEET).unwrap();

    assert_eq!(sheet.row_count(), table.rows.len());
    let first_month = OUTPUT_COLUMNS.len() + 1;

    for (idx, row) in table.rows.iter().enumerate() {
        assert_eq!(sheet.cell(idx, 1), &Cell::Text(row.contact.clone()));
        assert_eq!(sheet.cell(idx, 2), &Cell::Text(row.opportunity.clone()));
        assert_eq!(sheet.cell(idx, 7), &Cell::Bool(row.alert));

        match (&row.updated, sheet.cell(idx, 5)) {
            (Some(expected), Cell::DateTime(actual)) => assert_eq!(actual, expected),
            (None, Cell::Empty) => {}
            (expected, actual) => panic!("Updated mismatch: {:?} vs {:?}", expected, actual),
        }

        for (offset, value) in row.values.iter().enumerate() {
            assert_eq!(sheet.cell(idx, first_month + offset), &Cell::Number(*value));
        }
    }
}

#[test]
fn test_export_empty_table_is_valid_workbook() {
    let bytes = export_to_bytes(&ForecastTable::default()).unwrap();
    let sheet = load_sheet_from_bytes(&bytes, EXPORT_SHEET).unwrap();

    assert_eq!(sheet.row_count(), 0);
    // With no index values the used range may start at column B
    let expected: Vec<String> = OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect();
    assert!(sheet.headers.ends_with(&expected));
}

#[test]
fn test_export_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("forecast_data.xlsx");

    let table = sample_forecast();
    ForecastExporter::new(&table).export(&output_path).unwrap();

    assert!(output_path.exists());
    let sheet = load_sheet(&output_path, EXPORT_SHEET).unwrap();
    assert_eq!(sheet.row_count(), 3);
}

#[test]
fn test_export_to_missing_directory_fails() {
    let table = sample_forecast();
    let result = ForecastExporter::new(&table).export(std::path::Path::new(
        "/nonexistent/dir/forecast_data.xlsx",
    ));
    assert!(matches!(result, Err(ForecastError::Io(_))));
}
