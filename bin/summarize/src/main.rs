use std::{io, process};

use anyhow::Result;
use clap::Parser;
use diamond_deployment::{summarize_file, write_report};
use env_logger::Env;
use log::debug;

use crate::cli::AppArgs;

mod cli;

/// Prints each contract in a deployment transaction log as a Diamond or a Facet.
///
/// ```command
/// cargo run --release -p diamond_summarize -- broadcast/Deploy.s.sol/1/run-latest.json
/// ```
fn main() -> Result<()> {
    let args = AppArgs::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_filter())).init();

    let Some(path) = args.path else {
        eprintln!("No file path provided.");
        process::exit(1);
    };
    debug!("Summarising {}", path.display());

    let summary = match summarize_file(&path) {
        Ok(summary) => summary,
        Err(e) => {
            debug!("{e}");
            eprintln!(
                "Error reading or parsing file at {}: {}",
                path.display(),
                e.reason()
            );
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    write_report(&summary, args.style.into(), &mut stdout.lock())?;
    Ok(())
}
