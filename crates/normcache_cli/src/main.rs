//! Import smoke entry point.
//!
//! # Responsibility
//! - Import one JSON batch file into a SQLite cache and print the report.

use clap::Parser;
use log::error;
use normcache_core::{
    open_db, open_db_in_memory, ImportConfig, ImportService, SqliteStore,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "normcache_cli")]
#[command(about = "Import a JSON entity batch into the normalized cache")]
#[command(version)]
struct Args {
    /// Batch file: `{"kind": ..., "items": ...}`
    batch: PathBuf,

    /// Cache database file; in-memory when omitted
    #[arg(long)]
    db: Option<PathBuf>,

    /// Import config JSON
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<String, String> {
    let config = match &args.config {
        Some(path) => ImportConfig::from_path(path).map_err(|err| err.to_string())?,
        None => ImportConfig::default(),
    };
    config.init_logging()?;

    let text = std::fs::read_to_string(&args.batch)
        .map_err(|err| format!("failed to read {}: {err}", args.batch.display()))?;

    let mut conn = match &args.db {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    }
    .map_err(|err| err.to_string())?;
    let store = SqliteStore::try_new(&mut conn).map_err(|err| err.to_string())?;

    let mut service = ImportService::new(store, config);
    let report = service.import_json(&text).map_err(|err| err.to_string())?;
    serde_json::to_string_pretty(&report).map_err(|err| err.to_string())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version also land here.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            error!("event=cli_import module=cli status=error error={message}");
            eprintln!("normcache_cli: {message}");
            ExitCode::FAILURE
        }
    }
}
