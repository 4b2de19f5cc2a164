use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;
use crate::ledger::write_ledger;
use crate::models::{ConversionReport, FileReport, Row};
use crate::reader::TableSource;
use crate::rows::{drop_first_column, filter_rows};
use crate::sorter::{sort_by_date, validate_dates};
use crate::stitcher::stitch_rows;

/// Everything a conversion run needs, with paths already resolved.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub directory: PathBuf,
    pub csv_path: PathBuf,
    pub filter_strings: Vec<String>,
    pub date_format: String,
    pub header: Vec<String>,
    pub sort_files: bool,
}

/// Regular files in `dir` whose name ends in `.pdf` (case-sensitive).
pub fn list_pdfs(dir: &Path, sort: bool) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .file_name()
            .is_some_and(|n| n.as_encoded_bytes().ends_with(b".pdf"));
        if !is_pdf {
            continue;
        }
        if !path.is_file() {
            warn!(path = %path.display(), "skipping non-file .pdf entry");
            continue;
        }
        pdfs.push(path);
    }
    if sort {
        pdfs.sort();
    }
    Ok(pdfs)
}

/// Read, filter, stitch and trim one statement. Date keys are checked here
/// so a malformed date is reported against its file.
pub fn process_file<S: TableSource>(
    source: &S,
    path: &Path,
    filter_strings: &[String],
    date_format: &str,
) -> Result<(Vec<Row>, FileReport)> {
    let run = || -> Result<_> {
        let tables = source.read_tables(path)?;
        let rows_read = tables.rows.len();
        let kept = filter_rows(tables.rows, filter_strings);
        let rows_filtered = rows_read - kept.len();
        let stitched = stitch_rows(kept)?;
        let report = FileReport {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            pages: tables.pages,
            tables: tables.tables,
            rows_read,
            rows_filtered,
            rows_logical: stitched.len(),
        };
        let trimmed = drop_first_column(stitched);
        validate_dates(&trimmed, date_format)?;
        Ok((trimmed, report))
    };
    run().map_err(|e| e.in_file(path))
}

/// Convert every statement in the configured directory into one CSV ledger.
///
/// The ledger is only written once every file has been processed and the
/// combined rows sorted; any failure leaves the output untouched.
pub fn convert<S: TableSource>(source: &S, config: &PipelineConfig) -> Result<ConversionReport> {
    let pdfs = list_pdfs(&config.directory, config.sort_files)?;
    if pdfs.is_empty() {
        warn!(dir = %config.directory.display(), "no PDF statements found");
    }

    let mut master = Vec::new();
    let mut files = Vec::with_capacity(pdfs.len());
    for path in &pdfs {
        let (rows, report) = process_file(source, path, &config.filter_strings, &config.date_format)?;
        info!(
            file = %report.name,
            read = report.rows_read,
            filtered = report.rows_filtered,
            logical = report.rows_logical,
            "processed statement"
        );
        master.extend(rows);
        files.push(report);
    }

    let sorted = sort_by_date(master, &config.date_format)?;
    write_ledger(&config.csv_path, &config.header, &sorted)?;
    info!(rows = sorted.len(), path = %config.csv_path.display(), "ledger written");

    Ok(ConversionReport {
        files,
        rows_written: sorted.len(),
    })
}
