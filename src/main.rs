mod cli;
mod error;
#[cfg(feature = "sample")]
mod fmt;
mod layout;
mod ledger;
mod models;
mod pipeline;
mod reader;
#[cfg(feature = "sample")]
mod render;
mod rows;
mod settings;
mod sorter;
mod stitcher;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let level = if verbose { "stmtcsv=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert(args) => cli::convert::run(&args),
        #[cfg(feature = "sample")]
        Commands::Sample {
            directory,
            statements,
            relative_to,
        } => cli::sample::run(&directory, statements, relative_to),
        Commands::Completions { shell } => cli::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
