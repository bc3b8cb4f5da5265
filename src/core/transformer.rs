//! Reshape-and-aggregate: source sheet → forecast table

use super::merge::{build_descriptors, is_stale};
use super::pivot::pivot;
use super::projection::project;
use crate::config::ForecastConfig;
use crate::error::ForecastResult;
use crate::types::{Descriptor, ForecastRow, ForecastTable, Opportunity, SheetTable};
use serde::Serialize;
use tracing::info;

/// Counts describing how many source rows survive projection and filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionStats {
    pub source_rows: usize,
    pub dated_rows: usize,
    pub dropped_rows: usize,
}

pub struct Transformer {
    config: ForecastConfig,
}

impl Transformer {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Project the sheet and report how many rows carry a usable close date
    pub fn inspect(&self, sheet: &SheetTable) -> ForecastResult<ProjectionStats> {
        Ok(stats_for(&project(sheet)?))
    }

    /// Build the forecast table from the source sheet
    pub fn transform(&self, sheet: &SheetTable) -> ForecastResult<ForecastTable> {
        Ok(self.build(&project(sheet)?))
    }

    /// Table and row counts from a single projection pass
    pub fn transform_with_stats(
        &self,
        sheet: &SheetTable,
    ) -> ForecastResult<(ForecastTable, ProjectionStats)> {
        let records = project(sheet)?;
        Ok((self.build(&records), stats_for(&records)))
    }

    fn build(&self, records: &[Opportunity]) -> ForecastTable {
        let pivoted = pivot(records);
        // Lookup uses every projected row, including undated ones
        let descriptors = build_descriptors(records, self.config.dedup);

        let now = self.config.now();
        let missing = Descriptor::default();
        let rows: Vec<ForecastRow> = pivoted
            .rows
            .into_iter()
            .map(|row| {
                let d = descriptors.get(&row.contact).unwrap_or(&missing);
                ForecastRow {
                    alert: is_stale(d.updated, now, self.config.stale_after_days),
                    milestone: d.milestone.clone(),
                    owner: d.owner.clone(),
                    updated: d.updated,
                    status: d.status.clone(),
                    contact: row.contact,
                    opportunity: row.opportunity,
                    values: row.values,
                }
            })
            .collect();

        let alerts = rows.iter().filter(|r| r.alert).count();
        info!(
            source_rows = records.len(),
            forecast_rows = rows.len(),
            months = pivoted.months.len(),
            alerts,
            dedup = %self.config.dedup,
            "built forecast"
        );

        ForecastTable {
            months: pivoted.months,
            rows,
        }
    }
}

fn stats_for(records: &[Opportunity]) -> ProjectionStats {
    let dated = records.iter().filter(|r| r.close_date.is_some()).count();
    ProjectionStats {
        source_rows: records.len(),
        dated_rows: dated,
        dropped_rows: records.len() - dated,
    }
}

/// Transform with the given configuration
pub fn build_forecast(sheet: &SheetTable, config: &ForecastConfig) -> ForecastResult<ForecastTable> {
    Transformer::new(config.clone()).transform(sheet)
}
