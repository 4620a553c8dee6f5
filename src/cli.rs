use clap::Parser;
use std::path::PathBuf;

/// Command-line interface definition.
///
/// Verbosity levels:
/// 0 - silent
/// 1 - errors (default)
/// 2 - warnings + errors
/// 3 - info
/// 4 - debug
/// 5 - trace
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ipfilter",
    version,
    about = "Drop private addresses from an IP/CIDR list and expand small public CIDR blocks"
)]
pub struct Cli {
    /// Input file (defaults to stdin)
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Largest CIDR block (in addresses) that is expanded; values <= 0 mean the default of 128
    #[arg(
        short = 'm',
        long = "max-cidr-addresses",
        value_name = "N",
        allow_negative_numbers = true
    )]
    pub max_cidr_addresses: Option<i64>,

    /// Verbosity level (0-5)
    #[arg(long, default_value_t = 1)]
    pub verbose: u8,

    /// log4rs YAML configuration file (overrides --verbose)
    #[arg(long, value_name = "FILE")]
    pub log_config: Option<PathBuf>,

    /// Print a JSON run summary to stderr
    #[arg(long)]
    pub stats: bool,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Error,
            2 => log::LevelFilter::Warn,
            3 => log::LevelFilter::Info,
            4 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
