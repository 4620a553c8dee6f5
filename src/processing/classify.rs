//! Private and reserved range classification.

use crate::models::Network;
use lazy_static::lazy_static;
use std::net::IpAddr;

/// Ranges that never appear in filter output.
const RESERVED_CIDRS: &[&str] = &[
    // IPv4 "this network"
    "0.0.0.0/8",
    // IPv4 RFC1918
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    // IPv4 special-use
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    // IPv6 loopback + ULA + link-local
    "::1/128",
    "fc00::/7",
    "fe80::/10",
];

lazy_static! {
    /// Reserved range table, parsed once on first use.
    pub static ref RESERVED_RANGES: Vec<Network> = RESERVED_CIDRS
        .iter()
        .map(|cidr| {
            Network::new(cidr).unwrap_or_else(|e| panic!("invalid reserved CIDR {cidr}: {e}"))
        })
        .collect();
}

/// Check if an address falls inside any reserved range of its family.
///
/// Pass addresses in canonical form; an IPv4-mapped IPv6 address is only
/// matched against the IPv6 ranges.
pub fn is_private(addr: IpAddr) -> bool {
    RESERVED_RANGES.iter().any(|range| range.contains(addr))
}

/// Check if a block lies entirely inside one reserved range.
///
/// A block that only overlaps a reserved range is not private.
pub fn is_private_subset(block: &Network) -> bool {
    RESERVED_RANGES.iter().any(|range| block.is_subset_of(range))
}
