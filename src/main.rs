use clap::{Args, Parser, Subcommand};
use opportunity_forecast::cli;
use opportunity_forecast::config::{DedupPolicy, ForecastConfig, DEFAULT_STALE_AFTER_DAYS};
use opportunity_forecast::error::{ForecastError, ForecastResult};
use opportunity_forecast::excel::dates::parse_datetime_text;
use opportunity_forecast::schema::{EXPORT_FILE_NAME, SOURCE_SHEET};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forecast")]
#[command(about = "Turn a sales opportunities spreadsheet into a monthly revenue forecast.")]
#[command(long_about = "Forecast - sales pipeline → month-by-month revenue forecast

Reads the 'opportunities' sheet of an .xlsx workbook, sums GBP Value per
contact and opportunity by close month, merges milestone/owner/status,
flags opportunities not updated in the last 7 days, and writes the result
to forecast_data.xlsx with an optional SVG bar chart of monthly totals.

REQUIRED COLUMNS:
  Contact Name, Opportunity Name, Milestone, GBP Value,
  Close Date, Owner, Updated, Status

COMMANDS:
  run       - Build the forecast, print it and write the .xlsx
  chart     - Write only the monthly totals bar chart (SVG)
  validate  - Check the workbook schema and count usable rows

EXAMPLES:
  forecast run pipeline.xlsx                         # → forecast_data.xlsx
  forecast run pipeline.xlsx -o q3.xlsx --chart q3.svg
  forecast run pipeline.xlsx --dedup latest-updated --stale-days 14
  forecast chart pipeline.xlsx totals.svg
  forecast validate pipeline.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
struct ForecastArgs {
    /// Worksheet holding the opportunities
    #[arg(long, default_value = SOURCE_SHEET, env = "FORECAST_SHEET")]
    sheet: String,

    /// Flag opportunities not updated within this many days
    #[arg(long, default_value_t = DEFAULT_STALE_AFTER_DAYS, env = "FORECAST_STALE_DAYS")]
    stale_days: i64,

    /// Which row wins when a contact has several: first-seen or latest-updated
    #[arg(long, default_value = "first-seen", env = "FORECAST_DEDUP")]
    dedup: DedupPolicy,

    /// Measure staleness against this date instead of now (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<String>,
}

impl ForecastArgs {
    fn into_config(self) -> ForecastResult<ForecastConfig> {
        let mut config = ForecastConfig::default()
            .with_sheet(self.sheet)
            .with_stale_after_days(self.stale_days)
            .with_dedup(self.dedup);

        if let Some(as_of) = self.as_of {
            let now = parse_datetime_text(&as_of).ok_or_else(|| {
                ForecastError::Config(format!("Cannot read --as-of date '{}'", as_of))
            })?;
            config = config.with_reference_time(now);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Build the forecast table and write it to an .xlsx file.

The output has a single sheet 'Sheet1' with the row index in column A,
then Contact Name, Opportunity Name, Milestone, Owner, Updated, Status,
Alert and one column per close month (YYYY-MM, ascending).

Rows whose Close Date is missing or unreadable are left out.

EXAMPLES:
  forecast run pipeline.xlsx
  forecast run pipeline.xlsx -o forecast.xlsx --chart forecast.svg -v")]
    /// Build the forecast and write the .xlsx
    Run {
        /// Path to the opportunities workbook (.xlsx)
        input: PathBuf,

        /// Output Excel file path
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,

        /// Also write the monthly totals bar chart to this SVG file
        #[arg(long)]
        chart: Option<PathBuf>,

        #[command(flatten)]
        options: ForecastArgs,

        /// Show verbose steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the monthly totals bar chart (SVG)
    Chart {
        /// Path to the opportunities workbook (.xlsx)
        input: PathBuf,

        /// Output SVG file path
        output: PathBuf,

        #[command(flatten)]
        options: ForecastArgs,
    },

    /// Check the workbook schema and count usable rows
    Validate {
        /// Path to the opportunities workbook (.xlsx)
        input: PathBuf,

        #[command(flatten)]
        options: ForecastArgs,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opportunity_forecast=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ForecastResult<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            chart,
            options,
            verbose,
        } => cli::run(input, output, chart, options.into_config()?, verbose),

        Commands::Chart {
            input,
            output,
            options,
        } => cli::chart(input, output, options.into_config()?),

        Commands::Validate { input, options } => cli::validate(input, options.into_config()?),
    }
}
