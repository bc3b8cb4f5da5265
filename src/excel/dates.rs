//! Date coercion between spreadsheet cells and `NaiveDateTime`
//!
//! Unparseable input yields `None`; callers treat that as a missing date.

use crate::types::Cell;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Largest serial Excel can display (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

fn epoch(serial: f64) -> NaiveDateTime {
    // Serials below 61 predate Excel's phantom 1900-02-29
    let base = if serial < 61.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)
    };
    base.and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Convert an Excel serial date (1900 system) to a datetime
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.trunc();
    let seconds = ((serial - days) * 86_400.0).round() as i64;
    epoch(serial)
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Convert a datetime to an Excel serial date (1900 system)
pub fn datetime_to_excel_serial(dt: &NaiveDateTime) -> f64 {
    let base = epoch(61.0);
    let delta = *dt - base;
    let serial = delta.num_seconds() as f64 / 86_400.0;
    if serial < 61.0 {
        serial - 1.0
    } else {
        serial
    }
}

/// Parse free text using the fixed list of accepted layouts
pub fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Normalize any cell to a datetime, `None` when it cannot be read as one
pub fn cell_to_datetime(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(n) => excel_serial_to_datetime(*n),
        Cell::Text(s) => parse_datetime_text(s),
        Cell::Bool(_) | Cell::Empty => None,
    }
}
