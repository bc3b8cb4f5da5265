//! Excel exporter - forecast table → single-sheet .xlsx

use crate::error::{ForecastError, ForecastResult};
use crate::excel::dates::datetime_to_excel_serial;
use crate::schema::{EXPORT_SHEET, OUTPUT_COLUMNS};
use crate::types::{ForecastRow, ForecastTable};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};
use std::path::Path;
use tracing::info;

/// Writes a forecast table as a workbook, row index in column A
pub struct ForecastExporter<'a> {
    table: &'a ForecastTable,
}

struct ExportFormats {
    header: Format,
    index: Format,
    datetime: Format,
    money: Format,
}

impl ExportFormats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold().set_border(FormatBorder::Thin),
            index: Format::new().set_bold(),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            money: Format::new().set_num_format("#,##0.00"),
        }
    }
}

fn export_err(what: &str, e: impl std::fmt::Display) -> ForecastError {
    ForecastError::ExportFailed(format!("Failed to write {}: {}", what, e))
}

impl<'a> ForecastExporter<'a> {
    pub fn new(table: &'a ForecastTable) -> Self {
        Self { table }
    }

    /// Serialize to .xlsx bytes suitable for a download response
    pub fn to_bytes(&self) -> ForecastResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| ForecastError::ExportFailed(format!("Failed to save workbook: {}", e)))?;

        info!(
            rows = self.table.rows.len(),
            months = self.table.months.len(),
            bytes = buffer.len(),
            "exported forecast workbook"
        );
        Ok(buffer)
    }

    /// Write the workbook to a file
    pub fn export(&self, output_path: &Path) -> ForecastResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(output_path, bytes)?;
        Ok(())
    }

    fn build_workbook(&self) -> ForecastResult<Workbook> {
        let mut workbook = Workbook::new();
        let formats = ExportFormats::new();

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(EXPORT_SHEET)
            .map_err(|e| export_err("worksheet name", e))?;

        self.write_header(worksheet, &formats)?;
        for (idx, row) in self.table.rows.iter().enumerate() {
            self.write_row(worksheet, idx, row, &formats)?;
        }

        worksheet
            .set_freeze_panes(1, 3)
            .map_err(|e| export_err("freeze panes", e))?;

        Ok(workbook)
    }

    /// Header row; A1 stays blank above the index column
    fn write_header(&self, worksheet: &mut Worksheet, formats: &ExportFormats) -> ForecastResult<()> {
        worksheet
            .write_blank(0, 0, &formats.header)
            .map_err(|e| export_err("header", e))?;

        for (col_idx, name) in self.table.column_names().iter().enumerate() {
            let col = (col_idx + 1) as u16;
            worksheet
                .write_string_with_format(0, col, name, &formats.header)
                .map_err(|e| export_err("header", e))?;

            let width = if col_idx < OUTPUT_COLUMNS.len() { 20.0 } else { 12.0 };
            worksheet
                .set_column_width(col, width)
                .map_err(|e| export_err("column width", e))?;
        }
        Ok(())
    }

    fn write_row(
        &self,
        worksheet: &mut Worksheet,
        index: usize,
        row: &ForecastRow,
        formats: &ExportFormats,
    ) -> ForecastResult<()> {
        let r = (index + 1) as u32;

        worksheet
            .write_number_with_format(r, 0, index as f64, &formats.index)
            .map_err(|e| export_err("row index", e))?;

        worksheet
            .write_string(r, 1, &row.contact)
            .map_err(|e| export_err("contact name", e))?;
        worksheet
            .write_string(r, 2, &row.opportunity)
            .map_err(|e| export_err("opportunity name", e))?;

        let optional_text = [(3u16, &row.milestone), (4, &row.owner), (6, &row.status)];
        for (col, value) in optional_text {
            if let Some(text) = value {
                worksheet
                    .write_string(r, col, text)
                    .map_err(|e| export_err("descriptive text", e))?;
            }
        }

        if let Some(updated) = &row.updated {
            worksheet
                .write_number_with_format(r, 5, datetime_to_excel_serial(updated), &formats.datetime)
                .map_err(|e| export_err("updated date", e))?;
        }

        worksheet
            .write_boolean(r, 7, row.alert)
            .map_err(|e| export_err("alert flag", e))?;

        let first_month_col = (OUTPUT_COLUMNS.len() + 1) as u16;
        for (offset, value) in row.values.iter().enumerate() {
            worksheet
                .write_number_with_format(r, first_month_col + offset as u16, *value, &formats.money)
                .map_err(|e| export_err("month value", e))?;
        }

        Ok(())
    }
}

/// Serialize a forecast table to .xlsx bytes
pub fn export_to_bytes(table: &ForecastTable) -> ForecastResult<Vec<u8>> {
    ForecastExporter::new(table).to_bytes()
}
