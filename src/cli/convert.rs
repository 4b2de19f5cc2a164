use colored::Colorize;
use comfy_table::{Cell, Table};
use tracing::debug;

use crate::cli::{resolve_path, ConvertArgs};
use crate::error::Result;
use crate::models::ConversionReport;
use crate::pipeline::{convert, PipelineConfig};
use crate::reader::PdfTableReader;
use crate::rows::PeriodColumns;
use crate::settings::{load_settings, shellexpand_path, Settings};

/// Merge settings and flags into a resolved pipeline configuration.
fn build_config(args: &ConvertArgs, settings: Settings) -> Result<(PipelineConfig, PeriodColumns)> {
    let base = args.relative_to.unwrap_or(settings.base_dir);
    let filter_strings = if args.filter_strings.is_empty() {
        settings.filter_strings
    } else {
        args.filter_strings.clone()
    };
    let periods = if args.period_columns.is_empty() {
        settings
            .period_columns
            .map_or(PeriodColumns::All, |cols| PeriodColumns::from_indices(&cols))
    } else {
        PeriodColumns::from_indices(&args.period_columns)
    };
    let config = PipelineConfig {
        directory: resolve_path(&args.directory, base)?,
        csv_path: resolve_path(&args.csv_path, base)?,
        filter_strings,
        date_format: args.date_format.clone().unwrap_or(settings.date_format),
        header: settings.header,
        sort_files: settings.sort_files && !args.unsorted_files,
    };
    Ok((config, periods))
}

fn format_report(report: &ConversionReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["File", "Pages", "Tables", "Rows", "Filtered", "Logical"]);
    for file in &report.files {
        table.add_row(vec![
            Cell::new(&file.name),
            Cell::new(file.pages),
            Cell::new(file.tables),
            Cell::new(file.rows_read),
            Cell::new(file.rows_filtered),
            Cell::new(file.rows_logical),
        ]);
    }
    table.to_string()
}

pub fn run(args: &ConvertArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref().map(shellexpand_path).as_deref())?;
    let (config, periods) = build_config(args, settings)?;
    debug!(?config, ?periods, "resolved configuration");

    let reader = PdfTableReader::new(periods);
    let report = convert(&reader, &config)?;

    if !report.files.is_empty() {
        println!("{}", format_report(&report));
    }
    println!(
        "{} rows from {} statement(s) written to {}",
        report.rows_written.to_string().green().bold(),
        report.files.len(),
        config.csv_path.display()
    );
    Ok(())
}
