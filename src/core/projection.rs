//! Column projection and per-record normalization

use crate::error::{ForecastError, ForecastResult};
use crate::excel::dates::cell_to_datetime;
use crate::schema;
use crate::types::{Cell, Opportunity, SheetTable};
use tracing::warn;

/// Positions of the required columns within a source sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub contact: usize,
    pub opportunity: usize,
    pub milestone: usize,
    pub value: usize,
    pub close_date: usize,
    pub owner: usize,
    pub updated: usize,
    pub status: usize,
}

impl ColumnMap {
    /// Locate every required column, failing on the first one absent
    pub fn resolve(table: &SheetTable) -> ForecastResult<Self> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            contact: find(schema::CONTACT_NAME)?,
            opportunity: find(schema::OPPORTUNITY_NAME)?,
            milestone: find(schema::MILESTONE)?,
            value: find(schema::GBP_VALUE)?,
            close_date: find(schema::CLOSE_DATE)?,
            owner: find(schema::OWNER)?,
            updated: find(schema::UPDATED)?,
            status: find(schema::STATUS)?,
        })
    }
}

/// Project the source sheet onto the required columns with dates normalized.
///
/// Bad dates become `None`; nothing is filtered here.
pub fn project(table: &SheetTable) -> ForecastResult<Vec<Opportunity>> {
    let columns = ColumnMap::resolve(table)?;

    let records = (0..table.row_count())
        .map(|row| {
            let text = |col: usize| table.cell(row, col).as_text();
            Opportunity {
                contact: text(columns.contact).unwrap_or_default(),
                opportunity: text(columns.opportunity).unwrap_or_default(),
                milestone: text(columns.milestone),
                value: parse_money(table.cell(row, columns.value), row),
                close_date: cell_to_datetime(table.cell(row, columns.close_date)),
                owner: text(columns.owner),
                updated: cell_to_datetime(table.cell(row, columns.updated)),
                status: text(columns.status),
            }
        })
        .collect();

    Ok(records)
}

/// Read a GBP amount; blanks count as zero, unreadable text is logged and zeroed
fn parse_money(cell: &Cell, row: usize) -> f64 {
    match cell {
        Cell::Number(n) if n.is_finite() => *n,
        Cell::Empty => 0.0,
        Cell::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '£' | ',') && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                return 0.0;
            }
            // "NaN", "inf" and overflowing text parse as floats but are not amounts
            match cleaned.parse::<f64>().ok().filter(|v| v.is_finite()) {
                Some(value) => value,
                None => {
                    warn!(row = row + 2, value = %s, "unreadable GBP value, counting as 0");
                    0.0
                }
            }
        }
        other => {
            warn!(row = row + 2, value = ?other, "non-numeric GBP value, counting as 0");
            0.0
        }
    }
}
