use colored::Colorize;
use tracing::debug;

use crate::cli::resolve_path;
use crate::error::Result;
use crate::render::{render_statement, sample_statements};
use crate::settings::{load_settings, BaseDir};

pub fn run(directory: &str, count: usize, relative_to: Option<BaseDir>) -> Result<()> {
    let base = match relative_to {
        Some(base) => base,
        None => load_settings(None)?.base_dir,
    };
    let dir = resolve_path(directory, base)?;
    std::fs::create_dir_all(&dir)?;

    let statements = sample_statements(count);
    for statement in &statements {
        let path = dir.join(statement.file_name());
        std::fs::write(&path, render_statement(statement)?)?;
        debug!(path = %path.display(), entries = statement.entries.len(), "statement written");
    }

    println!(
        "{} sample statement(s) written to {}",
        statements.len().to_string().green().bold(),
        dir.display()
    );
    Ok(())
}
