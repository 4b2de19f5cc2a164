use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StmtError};
use crate::ledger::default_header;
use crate::rows::default_filter_strings;
use crate::sorter::DEFAULT_DATE_FORMAT;

/// Directory relative CLI paths are resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BaseDir {
    /// The directory holding the stmtcsv executable
    #[default]
    Install,
    /// The current working directory
    Cwd,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub filter_strings: Vec<String>,
    pub date_format: String,
    pub header: Vec<String>,
    /// Raw table columns to strip periods from; `None` means all of them.
    pub period_columns: Option<Vec<usize>>,
    pub sort_files: bool,
    pub base_dir: BaseDir,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filter_strings: default_filter_strings(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            header: default_header(),
            period_columns: None,
            sort_files: true,
            base_dir: BaseDir::default(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("stmtcsv")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings from `path`, or from the default location. A missing file
/// yields defaults; a file that does not parse is an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let path = path.map_or_else(settings_path, Path::to_path_buf);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content)
        .map_err(|e| StmtError::Settings(format!("{}: {e}", path.display())))
}

pub fn shellexpand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}
