pub mod completions;
pub mod convert;
#[cfg(feature = "sample")]
pub mod sample;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::{Result, StmtError};
use crate::settings::{shellexpand_path, BaseDir};

/// Resolve a path given on the command line. Absolute paths pass through;
/// relative ones are joined onto the install directory or the cwd.
pub(crate) fn resolve_path(raw: &str, base: BaseDir) -> Result<PathBuf> {
    let path = shellexpand_path(raw);
    if path.is_absolute() {
        return Ok(path);
    }
    let root = match base {
        BaseDir::Install => {
            let exe = std::env::current_exe()?;
            exe.parent()
                .map(|p| p.to_path_buf())
                .ok_or_else(|| StmtError::Other(format!("no parent directory for {}", exe.display())))?
        }
        BaseDir::Cwd => std::env::current_dir()?,
    };
    Ok(root.join(path))
}

#[derive(Parser)]
#[command(
    name = "stmtcsv",
    version,
    about = "Convert bank-statement PDFs into a single date-sorted CSV ledger."
)]
pub struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract, clean and merge every PDF statement in a directory into one CSV.
    Convert(ConvertArgs),
    /// Write demo bank statements as PDFs.
    #[cfg(feature = "sample")]
    Sample {
        /// Directory to write the statements into
        #[arg(long, default_value = "example_directory")]
        directory: String,
        /// Number of monthly statements to generate
        #[arg(long, default_value_t = 3)]
        statements: usize,
        /// Resolve a relative directory against the install dir or the cwd
        #[arg(long = "relative-to", value_enum)]
        relative_to: Option<BaseDir>,
    },
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory containing the PDF statements
    #[arg(long, default_value = "example_directory")]
    pub directory: String,
    /// Where to write the CSV ledger
    #[arg(long = "csv_path", default_value = "final_output.csv")]
    pub csv_path: String,
    /// Drop rows containing this text (repeatable; replaces the configured set)
    #[arg(long = "filter_strings")]
    pub filter_strings: Vec<String>,
    /// Raw table column to strip periods from (repeatable; default all columns)
    #[arg(long = "period-column")]
    pub period_columns: Vec<usize>,
    /// strftime format of the date column
    #[arg(long = "date-format")]
    pub date_format: Option<String>,
    /// Resolve relative paths against the install dir or the cwd
    #[arg(long = "relative-to", value_enum)]
    pub relative_to: Option<BaseDir>,
    /// Process PDFs in directory listing order instead of by name
    #[arg(long = "unsorted-files")]
    pub unsorted_files: bool,
    /// Settings file (default: ~/.config/stmtcsv/settings.json)
    #[arg(long)]
    pub config: Option<String>,
}
