//! Configuration for the filter.
//!
//! Settings are layered: built-in defaults, then environment variables
//! (a `.env` file is loaded by the binary), then command-line flags.

use std::path::PathBuf;

/// Default number of addresses a CIDR block may contain before it is kept
/// in CIDR notation instead of being expanded.
pub const DEFAULT_MAX_CIDR_ADDRESSES: i64 = 128;

/// Environment variable overriding the expansion limit.
pub const ENV_MAX_CIDR_ADDRESSES: &str = "IPFILTER_MAX_CIDR_ADDRESSES";

/// Environment variable naming a log4rs YAML file.
pub const ENV_LOG_CONFIG: &str = "IPFILTER_LOG_CONFIG";

/// Options controlling a filter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Caps how many addresses are emitted for a single CIDR block.
    /// Values <= 0 fall back to [`DEFAULT_MAX_CIDR_ADDRESSES`].
    pub max_cidr_addresses: i64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_cidr_addresses: DEFAULT_MAX_CIDR_ADDRESSES,
        }
    }
}

impl Options {
    pub fn new(max_cidr_addresses: i64) -> Self {
        Options { max_cidr_addresses }
    }

    /// Defaults overridden by `IPFILTER_MAX_CIDR_ADDRESSES` when it is set.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(value) = std::env::var(ENV_MAX_CIDR_ADDRESSES) {
            options.apply_env_value(&value);
        }
        options
    }

    fn apply_env_value(&mut self, value: &str) {
        match parse_limit(value) {
            Some(limit) => self.max_cidr_addresses = limit,
            None => log::warn!("Ignoring {ENV_MAX_CIDR_ADDRESSES}={value:?}: not an integer"),
        }
    }

    /// Apply a command-line override.
    pub fn merge_with_cli(&mut self, max_cidr_addresses: Option<i64>) {
        if let Some(limit) = max_cidr_addresses {
            self.max_cidr_addresses = limit;
        }
    }

    /// The limit actually used for expansion.
    pub fn expansion_limit(&self) -> usize {
        let limit = if self.max_cidr_addresses <= 0 {
            DEFAULT_MAX_CIDR_ADDRESSES
        } else {
            self.max_cidr_addresses
        };
        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}

fn parse_limit(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Log4rs configuration file from the flag, falling back to `IPFILTER_LOG_CONFIG`.
pub fn log_config_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| std::env::var_os(ENV_LOG_CONFIG).map(PathBuf::from))
}
