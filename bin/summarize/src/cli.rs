//! For Command Line Interface for diamond_summarize

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use diamond_deployment::ReportStyle;

/// Summarise the contracts deployed by a transaction log.
///
/// A contract that received a CALL transaction is reported as a Diamond,
/// any other contract as a Facet. For example:
/// ```
/// diamond_summarize broadcast/Deploy.s.sol/1/run-latest.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct AppArgs {
    /// JSON file with a top level `transactions` list
    pub path: Option<PathBuf>,
    /// Format of the report written to stdout.
    #[clap(short, long, value_enum, default_value_t = StyleFlag::Pretty)]
    pub style: StyleFlag,
    /// Log progress to stderr (-v info, -vv debug, -vvv trace). Ignored if RUST_LOG is set.
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum StyleFlag {
    /// Contract name and address on separate lines
    Pretty,
    /// One JSON array of contracts
    Json,
}

impl From<StyleFlag> for ReportStyle {
    fn from(flag: StyleFlag) -> Self {
        match flag {
            StyleFlag::Pretty => ReportStyle::Pretty,
            StyleFlag::Json => ReportStyle::Json,
        }
    }
}

impl AppArgs {
    /// Default log filter when RUST_LOG is absent.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "error",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
