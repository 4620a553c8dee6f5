//! CIDR expansion.
//!
//! A block at or under the expansion limit is enumerated address by address;
//! a larger one is handed back unexpanded.

use crate::error::Result;
use crate::models::{increment_addr, Network};
use std::net::IpAddr;

/// Result of expanding one block.
#[derive(Debug, Clone)]
pub enum Expansion {
    /// Every address of the block, ascending.
    Addresses(AddressRange),
    /// The block has more addresses than the limit allows.
    Unexpanded(Network),
}

/// Ascending iterator over a fixed number of consecutive addresses.
#[derive(Debug, Clone)]
pub struct AddressRange {
    next: IpAddr,
    remaining: u128,
}

impl AddressRange {
    pub fn new(start: IpAddr, count: u128) -> Self {
        AddressRange {
            next: start,
            remaining: count,
        }
    }
}

impl Iterator for AddressRange {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.next = increment_addr(current);
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Expand `block` into its addresses, or return it unexpanded when it holds
/// more than `limit` addresses.
pub fn expand(block: &Network, limit: usize) -> Result<Expansion> {
    let size = block.size()?;
    let limit = limit as u128;

    match size {
        Some(count) if count <= limit => {
            log::trace!("expand {block} into {count} addresses");
            Ok(Expansion::Addresses(AddressRange::new(block.lo(), count)))
        }
        // None is 2^128, past any limit
        _ => {
            log::trace!("keep {block}: over limit {limit}");
            Ok(Expansion::Unexpanded(*block))
        }
    }
}
