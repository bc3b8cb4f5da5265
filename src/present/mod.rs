//! Presentation: table view, long-form reshape and the monthly bar chart
//!
//! Nothing here feeds back into the exported data.

pub mod bar_chart;
pub mod melt;
pub mod table;

pub use bar_chart::{render_bar_chart, BarChartRenderer};
pub use melt::{aggregate_by_month, is_month_key, melt, monthly_totals, LongRow};
pub use table::{format_money, render_table_text};
