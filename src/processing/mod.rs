//! Entry processing logic.
//!
//! - [`entry`] - port stripping and entry parsing
//! - [`classify`] - reserved range table and private checks
//! - [`expand`] - CIDR block expansion
//! - [`filter`] - line-by-line stream filtering

mod classify;
mod entry;
mod expand;
mod filter;

// Re-export public functions
pub use classify::{is_private, is_private_subset, RESERVED_RANGES};
pub use entry::{parse_entry, strip_port, Entry};
pub use expand::{expand, AddressRange, Expansion};
pub use filter::{filter, FilterStats, Processor};
