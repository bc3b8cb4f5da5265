//! Forecast API Server binary
//!
//! HTTP front end for the forecast pipeline: upload a workbook, get the
//! table, the chart or the .xlsx download back.

use clap::Parser;
use opportunity_forecast::api::{run_api_server, server::ApiConfig};
use opportunity_forecast::config::{DedupPolicy, ForecastConfig, DEFAULT_STALE_AFTER_DAYS};
use opportunity_forecast::schema::SOURCE_SHEET;

#[derive(Parser, Debug)]
#[command(name = "forecast-server")]
#[command(version)]
#[command(about = "Forecast API Server - upload an opportunities workbook, download a revenue forecast")]
#[command(long_about = r#"
Forecast API Server

Every upload endpoint takes the raw .xlsx bytes as the request body:
  - POST /api/v1/forecast         - Table, monthly totals and SVG chart (JSON)
  - POST /api/v1/forecast/chart   - Monthly totals bar chart (image/svg+xml)
  - POST /api/v1/forecast/export  - forecast_data.xlsx download

Optional query parameters: sheet, stale_days, dedup (first-seen|latest-updated)

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  forecast-server                           # Start on localhost:8080
  forecast-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/forecast/export \
    --data-binary @pipeline.xlsx -o forecast_data.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "FORECAST_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "FORECAST_PORT")]
    port: u16,

    /// Largest accepted upload in megabytes
    #[arg(long, default_value = "25", env = "FORECAST_MAX_UPLOAD_MB")]
    max_upload_mb: usize,

    /// Default worksheet holding the opportunities
    #[arg(long, default_value = SOURCE_SHEET, env = "FORECAST_SHEET")]
    sheet: String,

    /// Default staleness window in days
    #[arg(long, default_value_t = DEFAULT_STALE_AFTER_DAYS, env = "FORECAST_STALE_DAYS")]
    stale_days: i64,

    /// Default dedup policy: first-seen or latest-updated
    #[arg(long, default_value = "first-seen", env = "FORECAST_DEDUP")]
    dedup: DedupPolicy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let max_upload_bytes = ApiConfig::upload_limit_from_mb(args.max_upload_mb).ok_or_else(|| {
        anyhow::anyhow!("--max-upload-mb {} is too large", args.max_upload_mb)
    })?;

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        max_upload_bytes,
    };

    let defaults = ForecastConfig::default()
        .with_sheet(args.sheet)
        .with_stale_after_days(args.stale_days)
        .with_dedup(args.dedup);

    run_api_server(config, defaults).await
}
