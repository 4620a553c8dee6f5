//! Normalize line-oriented IP address lists.
//!
//! Private and reserved addresses are dropped, small public CIDR blocks are
//! expanded into their addresses and everything else passes through.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;

use std::fs::File;
use std::io::{self, Read, Write};

pub use config::Options;
pub use error::{FilterError, Result};
pub use processing::{filter, FilterStats};

/// Run one filter pass as described by the command line.
///
/// Input and output default to stdin/stdout. The files are closed when this
/// returns, on success and on error alike.
pub fn run(cli: &cli::Cli) -> Result<FilterStats> {
    let mut options = Options::from_env();
    options.merge_with_cli(cli.max_cidr_addresses);

    let input: Box<dyn Read> = match &cli.input {
        Some(path) => {
            log::info!("Reading from {}", path.display());
            let file = File::open(path)
                .map_err(|e| FilterError::file(path.display().to_string(), "open", e))?;
            Box::new(file)
        }
        None => Box::new(io::stdin().lock()),
    };

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => {
            log::info!("Writing to {}", path.display());
            let file = File::create(path)
                .map_err(|e| FilterError::file(path.display().to_string(), "create", e))?;
            Box::new(file)
        }
        None => Box::new(io::stdout().lock()),
    };

    filter(input, output, &options)
}
