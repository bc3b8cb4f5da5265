//! Month pivot: (contact, opportunity) × year-month → summed GBP value

use crate::types::{Opportunity, YearMonth};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One pivoted key with a value per month of `PivotTable::months`
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub contact: String,
    pub opportunity: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    pub months: Vec<YearMonth>,
    pub rows: Vec<PivotRow>,
}

/// Group dated records by key and month, summing values.
///
/// Records without a close date or with a blank key are skipped. Rows come
/// out sorted by (contact, opportunity) and months ascending; cells with no
/// records are zero.
pub fn pivot(records: &[Opportunity]) -> PivotTable {
    let mut months = BTreeSet::new();
    let mut groups: BTreeMap<(String, String), BTreeMap<YearMonth, f64>> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(close) = record.close_date else {
            skipped += 1;
            continue;
        };
        if record.contact.is_empty() || record.opportunity.is_empty() {
            skipped += 1;
            continue;
        }

        let month = YearMonth::from_datetime(&close);
        months.insert(month);
        *groups
            .entry((record.contact.clone(), record.opportunity.clone()))
            .or_default()
            .entry(month)
            .or_insert(0.0) += record.value;
    }

    let months: Vec<YearMonth> = months.into_iter().collect();
    let rows = groups
        .into_iter()
        .map(|((contact, opportunity), by_month)| PivotRow {
            contact,
            opportunity,
            values: months
                .iter()
                .map(|m| by_month.get(m).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect::<Vec<_>>();

    debug!(
        records = records.len(),
        skipped,
        keys = rows.len(),
        months = months.len(),
        "pivoted records"
    );

    PivotTable { months, rows }
}
