//! Address models for the filter.
//!
//! - [`Network`] - IPv4/IPv6 block in CIDR notation
//! - address helpers for canonical form, masking and enumeration

mod network;

// Re-export public types
pub use network::{
    block_size, broadcast_addr, canonical_block, cut_addr, format_addr, get_cidr_mask,
    increment_addr, max_length, Network, MAX_LENGTH_V4, MAX_LENGTH_V6,
};
