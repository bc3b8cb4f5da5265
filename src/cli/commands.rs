use crate::config::ForecastConfig;
use crate::core::Transformer;
use crate::error::ForecastResult;
use crate::excel::{load_sheet, ForecastExporter};
use crate::present::{format_money, monthly_totals, render_table_text, BarChartRenderer};
use crate::schema::REQUIRED_COLUMNS;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

fn print_config(config: &ForecastConfig) {
    println!("   Sheet: {}", config.sheet.bright_blue());
    println!(
        "   Stale after: {} days | Dedup: {}",
        config.stale_after_days,
        config.dedup.to_string().bright_yellow()
    );
    println!();
}

/// Execute the run command: table, totals, .xlsx and optional chart
pub fn run(
    input: PathBuf,
    output: PathBuf,
    chart: Option<PathBuf>,
    config: ForecastConfig,
    verbose: bool,
) -> ForecastResult<()> {
    println!("{}", "📈 Forecast - Building revenue forecast".bold().green());
    println!("   File: {}", input.display());
    print_config(&config);
    config.validate()?;

    if verbose {
        println!("{}", "📖 Loading workbook...".cyan());
    }
    let sheet = load_sheet(&input, &config.sheet)?;

    let (table, stats) = Transformer::new(config).transform_with_stats(&sheet)?;
    if verbose {
        println!(
            "   {} rows, {} with a close date, {} dropped\n",
            stats.source_rows, stats.dated_rows, stats.dropped_rows
        );
    }

    println!("{}", "✅ Forecast:".bold().green());
    if table.is_empty() {
        println!("{}", "⚠️  No opportunities with a valid close date".yellow());
    }
    println!("{}", render_table_text(&table));

    let totals = monthly_totals(&table);
    if !totals.is_empty() {
        println!("{}", "📊 Monthly totals:".bold().cyan());
        for total in &totals {
            println!("   {}  {}", total.month.bright_blue(), format_money(total.value).bold());
        }
        println!();
    }

    ForecastExporter::new(&table).export(&output)?;
    println!("{} {}", "💾 Saved".green(), output.display());

    if let Some(chart_path) = chart {
        let svg = BarChartRenderer::default().render(&totals)?;
        fs::write(&chart_path, svg)?;
        println!("{} {}", "🖼  Chart".green(), chart_path.display());
    }

    Ok(())
}

/// Execute the chart command: write only the monthly bar chart
pub fn chart(input: PathBuf, output: PathBuf, config: ForecastConfig) -> ForecastResult<()> {
    println!("{}", "📊 Forecast - Rendering chart".bold().green());
    println!("   File: {}", input.display());
    print_config(&config);
    config.validate()?;

    let sheet = load_sheet(&input, &config.sheet)?;
    let table = Transformer::new(config).transform(&sheet)?;
    let totals = monthly_totals(&table);
    let svg = BarChartRenderer::default().render(&totals)?;
    fs::write(&output, svg)?;

    println!(
        "{} {} ({} bars)",
        "✅ Chart written to".bold().green(),
        output.display(),
        totals.len()
    );
    Ok(())
}

/// Execute the validate command: schema check and row counts, no output files
pub fn validate(input: PathBuf, config: ForecastConfig) -> ForecastResult<()> {
    println!("{}", "✅ Validating workbook".bold().green());
    println!("   File: {}", input.display());
    println!("   Sheet: {}\n", config.sheet.bright_blue());
    config.validate()?;

    let sheet = load_sheet(&input, &config.sheet)?;
    let stats = Transformer::new(config).inspect(&sheet)?;

    println!("   {} required columns present", REQUIRED_COLUMNS.len());
    println!("   {} source rows", stats.source_rows);
    println!("   {} with a valid close date", stats.dated_rows.to_string().green());
    if stats.dropped_rows > 0 {
        println!(
            "   {} dropped (missing or unreadable close date)",
            stats.dropped_rows.to_string().yellow()
        );
    }
    println!();
    println!("{}", "✅ Workbook is valid".bold().green());
    Ok(())
}
