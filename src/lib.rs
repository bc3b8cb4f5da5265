//! Opportunity Forecast - sales pipeline spreadsheet → monthly revenue forecast
//!
//! Reads the `opportunities` sheet of an uploaded workbook, pivots GBP value
//! by close month per (contact, opportunity), merges the latest descriptive
//! attributes, flags stale opportunities, and hands back the table, a monthly
//! bar chart and an .xlsx download.
//!
//! # Example
//!
//! ```no_run
//! use opportunity_forecast::config::ForecastConfig;
//! use opportunity_forecast::pipeline::run_pipeline;
//!
//! let bytes = std::fs::read("pipeline.xlsx")?;
//! let report = run_pipeline(&bytes, &ForecastConfig::default())?;
//!
//! println!("Rows: {}", report.table.rows.len());
//! println!("Months: {}", report.table.months.len());
//!
//! std::fs::write("forecast_data.xlsx", report.to_xlsx()?)?;
//! # Ok::<(), opportunity_forecast::error::ForecastError>(())
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod pipeline;
pub mod present;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use config::{DedupPolicy, ForecastConfig};
pub use error::{ForecastError, ForecastResult};
pub use pipeline::{run_pipeline, ForecastReport};
pub use types::{Cell, ForecastRow, ForecastTable, MonthlyTotal, SheetTable, YearMonth};
