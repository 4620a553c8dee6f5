//! Entry parsing.
//!
//! Turns one trimmed input line into an address or a CIDR block, after
//! dropping any port suffix.

use crate::error::{FilterError, Result};
use crate::models::Network;
use lazy_static::lazy_static;
use regex::Regex;
use std::net::IpAddr;

/// One parsed input entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// A single address, already in canonical form.
    Address(IpAddr),
    /// A CIDR block, holding its base address.
    Block(Network),
}

lazy_static! {
    // "[host]:port" - greedy so the last "]:" wins
    static ref BRACKETED_PORT: Regex = Regex::new(r"^\[(.*)\]:").expect("Invalid Regex?");
    // "host:port" with exactly one colon; IPv6 text always has more
    static ref SINGLE_COLON_PORT: Regex = Regex::new(r"^([^:]*):[^:]*$").expect("Invalid Regex?");
}

/// Remove a port suffix from an entry if present.
///
/// Handles `203.0.113.10:443`, `[2001:db8::1]:443` and a bare `[2001:db8::1]`.
/// Anything else is returned unchanged.
pub fn strip_port(entry: &str) -> &str {
    if entry.starts_with('[') {
        if let Some(host) = BRACKETED_PORT.captures(entry).and_then(|c| c.get(1)) {
            return host.as_str();
        }
        if entry.ends_with(']') {
            return entry.trim_matches(|c| c == '[' || c == ']');
        }
        return entry;
    }

    match SINGLE_COLON_PORT.captures(entry).and_then(|c| c.get(1)) {
        Some(host) => host.as_str(),
        None => entry,
    }
}

/// Parse a trimmed input line into an [`Entry`].
///
/// The address form is tried first, then CIDR notation.
pub fn parse_entry(raw: &str) -> Result<Entry> {
    let entry = strip_port(raw);

    if let Ok(addr) = entry.parse::<IpAddr>() {
        return Ok(Entry::Address(addr.to_canonical()));
    }

    Network::new(entry)
        .map(Entry::Block)
        .map_err(|_| FilterError::parse(entry))
}
