//! Wide → long reshape and monthly totals for charting

use crate::schema::MONTH_KEY_PATTERN;
use crate::types::{ForecastTable, MonthlyTotal};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// One (key, month, value) cell of the forecast in long form
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub contact: String,
    pub opportunity: String,
    pub status: Option<String>,
    pub month: String,
    pub value: f64,
}

fn month_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MONTH_KEY_PATTERN).expect("month key pattern is valid"))
}

/// True if a column label looks like `YYYY-MM`
pub fn is_month_key(label: &str) -> bool {
    month_key_regex().is_match(label)
}

/// Unpivot the month columns, keeping identity columns on every row
pub fn melt(table: &ForecastTable) -> Vec<LongRow> {
    let labels: Vec<String> = table.months.iter().map(|m| m.to_string()).collect();

    table
        .rows
        .iter()
        .flat_map(|row| {
            labels
                .iter()
                .zip(row.values.iter())
                .filter(|(label, _)| is_month_key(label))
                .map(move |(label, value)| LongRow {
                    contact: row.contact.clone(),
                    opportunity: row.opportunity.clone(),
                    status: row.status.clone(),
                    month: label.clone(),
                    value: *value,
                })
        })
        .collect()
}

/// Sum long rows by month, ascending
pub fn aggregate_by_month(rows: &[LongRow]) -> Vec<MonthlyTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        *sums.entry(row.month.as_str()).or_insert(0.0) += row.value;
    }
    sums.into_iter()
        .map(|(month, value)| MonthlyTotal {
            month: month.to_string(),
            value,
        })
        .collect()
}

/// Per-month totals of the forecast table
pub fn monthly_totals(table: &ForecastTable) -> Vec<MonthlyTotal> {
    aggregate_by_month(&melt(table))
}
