//! Shared fixtures: build opportunities workbooks in memory

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use opportunity_forecast::excel::dates::datetime_to_excel_serial;
use opportunity_forecast::schema::{REQUIRED_COLUMNS, SOURCE_SHEET};
use rust_xlsxwriter::{Format, Workbook};

/// How a date cell is written into the fixture
#[derive(Clone, Debug)]
pub enum DateCell {
    Date(NaiveDateTime),
    Text(String),
    Empty,
}

#[derive(Clone, Debug)]
pub struct SourceRow {
    pub contact: String,
    pub opportunity: String,
    pub milestone: String,
    pub value: f64,
    /// Written instead of `value` when set, as a text cell
    pub value_text: Option<String>,
    pub close: DateCell,
    pub owner: String,
    pub updated: DateCell,
    pub status: String,
}

impl SourceRow {
    pub fn new(contact: &str, opportunity: &str, value: f64, close: DateCell) -> Self {
        Self {
            contact: contact.to_string(),
            opportunity: opportunity.to_string(),
            milestone: "Proposal".to_string(),
            value,
            value_text: None,
            close,
            owner: "Sam".to_string(),
            updated: DateCell::Date(reference_time()),
            status: "Open".to_string(),
        }
    }

    pub fn milestone(mut self, milestone: &str) -> Self {
        self.milestone = milestone.to_string();
        self
    }

    pub fn value_text(mut self, text: &str) -> Self {
        self.value_text = Some(text.to_string());
        self
    }

    pub fn updated(mut self, updated: DateCell) -> Self {
        self.updated = updated;
        self
    }
}

/// Fixed "now" used by every fixture
pub fn reference_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn days_ago(days: i64) -> DateCell {
    DateCell::Date(reference_time() - Duration::days(days))
}

pub fn date(y: i32, m: u32, d: u32) -> DateCell {
    DateCell::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
}

pub fn text(s: &str) -> DateCell {
    DateCell::Text(s.to_string())
}

/// Workbook with the standard sheet and columns
pub fn opportunities_workbook(rows: &[SourceRow]) -> Vec<u8> {
    workbook_with(SOURCE_SHEET, &REQUIRED_COLUMNS, rows)
}

/// Workbook with a chosen sheet name and header list; cells follow the
/// standard column order, truncated to the header count
pub fn workbook_with(sheet: &str, headers: &[&str], rows: &[SourceRow]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            match *header {
                "Contact Name" => {
                    worksheet.write_string(r, col, &row.contact).unwrap();
                }
                "Opportunity Name" => {
                    worksheet.write_string(r, col, &row.opportunity).unwrap();
                }
                "Milestone" => {
                    worksheet.write_string(r, col, &row.milestone).unwrap();
                }
                "GBP Value" => match &row.value_text {
                    Some(text) => {
                        worksheet.write_string(r, col, text).unwrap();
                    }
                    None => {
                        worksheet.write_number(r, col, row.value).unwrap();
                    }
                },
                "Close Date" | "Updated" => {
                    let cell = if *header == "Close Date" {
                        &row.close
                    } else {
                        &row.updated
                    };
                    match cell {
                        DateCell::Date(dt) => {
                            worksheet
                                .write_number_with_format(
                                    r,
                                    col,
                                    datetime_to_excel_serial(dt),
                                    &date_format,
                                )
                                .unwrap();
                        }
                        DateCell::Text(s) => {
                            worksheet.write_string(r, col, s).unwrap();
                        }
                        DateCell::Empty => {}
                    }
                }
                "Owner" => {
                    worksheet.write_string(r, col, &row.owner).unwrap();
                }
                "Status" => {
                    worksheet.write_string(r, col, &row.status).unwrap();
                }
                _ => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}
