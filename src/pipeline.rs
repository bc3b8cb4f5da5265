//! End-to-end run: workbook bytes → forecast table, totals, chart, download

use crate::config::ForecastConfig;
use crate::core::{ProjectionStats, Transformer};
use crate::error::ForecastResult;
use crate::excel::{export_to_bytes, load_sheet_from_bytes};
use crate::present::{monthly_totals, BarChartRenderer};
use crate::types::{ForecastTable, MonthlyTotal};
use serde::Serialize;
use tracing::info;

/// Everything one upload produces
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub stats: ProjectionStats,
    pub table: ForecastTable,
    pub totals: Vec<MonthlyTotal>,
    pub chart_svg: String,
}

impl ForecastReport {
    /// The download artifact for this report
    pub fn to_xlsx(&self) -> ForecastResult<Vec<u8>> {
        export_to_bytes(&self.table)
    }
}

/// Load and transform only
pub fn forecast_from_bytes(bytes: &[u8], config: &ForecastConfig) -> ForecastResult<ForecastTable> {
    config.validate()?;
    let sheet = load_sheet_from_bytes(bytes, &config.sheet)?;
    Transformer::new(config.clone()).transform(&sheet)
}

/// Load, transform, summarize and draw the chart
pub fn run_pipeline(bytes: &[u8], config: &ForecastConfig) -> ForecastResult<ForecastReport> {
    config.validate()?;
    let sheet = load_sheet_from_bytes(bytes, &config.sheet)?;
    info!(sheet = %config.sheet, rows = sheet.row_count(), "loaded upload");

    let (table, stats) = Transformer::new(config.clone()).transform_with_stats(&sheet)?;
    let totals = monthly_totals(&table);
    let chart_svg = BarChartRenderer::default().render(&totals)?;

    Ok(ForecastReport {
        stats,
        table,
        totals,
        chart_svg,
    })
}
