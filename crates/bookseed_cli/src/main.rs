//! `bookseed` command-line entry point.
//!
//! # Responsibility
//! - Map command-line flags and `BOOKSEED_*` variables onto `SeedConfig`.
//! - Initialize logging, run one seeding pass, report the outcome.

use bookseed_core::config::{DEFAULT_DATABASE_PATH, DEFAULT_INPUT_PATH};
use bookseed_core::{default_log_level, init_logging, run_seed, DatabaseTarget, SeedConfig};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Seed a SQLite book catalog from a JSON export. Existing catalog tables
/// are dropped and recreated on every run.
#[derive(Debug, Parser)]
#[command(name = "bookseed", version)]
struct Cli {
    /// JSON file holding an array of book records.
    #[arg(short, long, env = "BOOKSEED_INPUT", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// SQLite database file to (re)create.
    #[arg(short, long, env = "BOOKSEED_DATABASE", default_value = DEFAULT_DATABASE_PATH)]
    database: PathBuf,

    /// Seed a throwaway in-memory database; `--database` is ignored.
    #[arg(long)]
    in_memory: bool,

    /// trace|debug|info|warn|error
    #[arg(long, env = "BOOKSEED_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files, in addition to stderr.
    #[arg(long, env = "BOOKSEED_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> SeedConfig {
        SeedConfig {
            database: if self.in_memory {
                DatabaseTarget::Memory
            } else {
                DatabaseTarget::File(self.database)
            },
            input_path: self.input,
            log_level: self
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: self.log_dir,
        }
    }
}

fn main() -> ExitCode {
    let config = Cli::parse().into_config();

    if let Err(err) = init_logging(&config.log_level, config.log_dir.as_deref()) {
        eprintln!("bookseed: {err}");
        return ExitCode::FAILURE;
    }

    match run_seed(&config) {
        Ok(report) => {
            println!(
                "seeded {} books ({} skipped), {} authors, {} categories",
                report.books_created,
                report.books_skipped,
                report.authors_created,
                report.categories_created
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("bookseed: {}", error_chain(&err));
            ExitCode::FAILURE
        }
    }
}

fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
