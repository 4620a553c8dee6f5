//! IP address and CIDR block utilities.
//!
//! Provides [`Network`] for representing IPv4 and IPv6 blocks in CIDR
//! notation, along with the address arithmetic the filter relies on.
//! All arithmetic is done on the address value widened to `u128`, so the
//! same code serves both families.

use crate::error::{FilterError, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Maximum prefix length for an IPv4 block (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;
/// Maximum prefix length for an IPv6 block (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// Width in bits of the address family of `addr`.
pub fn max_length(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => MAX_LENGTH_V4,
        IpAddr::V6(_) => MAX_LENGTH_V6,
    }
}

fn all_bits(width: u8) -> u128 {
    if width == MAX_LENGTH_V6 {
        u128::MAX
    } else {
        (1u128 << width) - 1
    }
}

fn addr_bits(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

fn addr_from_bits(family: IpAddr, bits: u128) -> IpAddr {
    match family {
        IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::from(bits as u32)),
        IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// Normalize a block so two spellings of it compare equal.
///
/// An IPv4-mapped IPv6 block (`::ffff:a.b.c.d/n`, `n >= 96`) collapses to the
/// IPv4 block `a.b.c.d/(n - 96)`. Shorter prefixes reach outside
/// `::ffff:0:0/96` and stay IPv6.
pub fn canonical_block(addr: IpAddr, mask: u8) -> (IpAddr, u8) {
    let prefix = MAX_LENGTH_V6 - MAX_LENGTH_V4;
    match addr {
        IpAddr::V6(v6) if mask >= prefix => match v6.to_ipv4_mapped() {
            Some(v4) => (IpAddr::V4(v4), mask - prefix),
            None => (addr, mask),
        },
        _ => (addr, mask),
    }
}

/// Canonical text of an address: dotted decimal, or compressed lowercase IPv6.
pub fn format_addr(addr: IpAddr) -> String {
    addr.to_canonical().to_string()
}

/// Convert a prefix length to a network mask for the family of `addr`.
///
/// # Examples
/// ```
/// use ipfilter::models::get_cidr_mask;
/// use std::net::IpAddr;
/// let v4: IpAddr = "10.0.0.0".parse().unwrap();
/// assert_eq!(get_cidr_mask(v4, 24).unwrap(), 0xFFFF_FF00);
/// ```
pub fn get_cidr_mask(addr: IpAddr, len: u8) -> Result<u128> {
    let width = max_length(addr);
    if len > width {
        return Err(FilterError::size(format!("{addr}/{len}")));
    }
    let right_len = u32::from(width - len);
    let host_bits = 1u128.checked_shl(right_len).map_or(u128::MAX, |v| v - 1);
    Ok(all_bits(width) & !host_bits)
}

/// Get the network (base) address for a given IP and prefix length.
pub fn cut_addr(addr: IpAddr, len: u8) -> Result<IpAddr> {
    let mask = get_cidr_mask(addr, len)?;
    Ok(addr_from_bits(addr, addr_bits(addr) & mask))
}

/// Calculate the highest address of the block containing `addr`.
pub fn broadcast_addr(addr: IpAddr, len: u8) -> Result<IpAddr> {
    let mask = get_cidr_mask(addr, len)?;
    let host = all_bits(max_length(addr)) & !mask;
    Ok(addr_from_bits(addr, (addr_bits(addr) & mask) | host))
}

/// Number of addresses in a block of prefix `len` in the family of `addr`.
///
/// `Ok(None)` means the count does not fit in a `u128`, which only
/// happens for the whole IPv6 space (2^128 addresses).
pub fn block_size(addr: IpAddr, len: u8) -> Result<Option<u128>> {
    let width = max_length(addr);
    if len > width {
        return Err(FilterError::size(format!("{addr}/{len}")));
    }
    Ok(1u128.checked_shl(u32::from(width - len)))
}

/// Add one to an address, carrying from the least significant octet.
/// The highest address wraps around to zero.
pub fn increment_addr(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let mut octets = v4.octets();
            ripple_increment(&mut octets);
            IpAddr::V4(Ipv4Addr::from(octets))
        }
        IpAddr::V6(v6) => {
            let mut octets = v6.octets();
            ripple_increment(&mut octets);
            IpAddr::V6(Ipv6Addr::from(octets))
        }
    }
}

fn ripple_increment(octets: &mut [u8]) {
    for octet in octets.iter_mut().rev() {
        *octet = octet.wrapping_add(1);
        if *octet != 0 {
            break;
        }
    }
}

/// An IPv4 or IPv6 block in CIDR notation.
///
/// Blocks built with [`Network::new`] or [`Network::from_parts`] always hold
/// their base address; host bits of the input are dropped.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub struct Network {
    /// The base address of the block.
    pub addr: IpAddr,
    /// The prefix length (0-32 for IPv4, 0-128 for IPv6).
    pub mask: u8,
}

impl Network {
    /// Create a new [`Network`] from a CIDR string (e.g. "203.0.113.0/24").
    pub fn new(addr_cidr: &str) -> Result<Network> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| FilterError::parse(addr_cidr))?;
        let addr: IpAddr = addr.parse().map_err(|_| FilterError::parse(addr_cidr))?;
        // u8::from_str would also take a leading '+'
        if mask.is_empty() || !mask.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FilterError::parse(addr_cidr));
        }
        let mask: u8 = mask.parse().map_err(|_| FilterError::parse(addr_cidr))?;
        Network::from_parts(addr, mask)
    }

    /// Build a block from an address and prefix length.
    ///
    /// IPv4-mapped IPv6 blocks are stored as IPv4, see [`canonical_block`].
    pub fn from_parts(addr: IpAddr, mask: u8) -> Result<Network> {
        if mask > max_length(addr) {
            return Err(FilterError::parse(format!("{addr}/{mask}")));
        }
        let (addr, mask) = canonical_block(addr, mask);
        Ok(Network {
            addr: cut_addr(addr, mask)?,
            mask,
        })
    }

    /// Width in bits of the block's address family.
    pub fn width(&self) -> u8 {
        max_length(self.addr)
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }

    // A hand-built block may carry a prefix wider than its family; membership
    // treats it as a single address, sizing reports it as an error.
    fn effective_mask(&self) -> u8 {
        self.mask.min(self.width())
    }

    /// Get the lowest (network) address in the block.
    pub fn lo(&self) -> IpAddr {
        let mask = get_cidr_mask(self.addr, self.effective_mask()).unwrap_or(u128::MAX);
        addr_from_bits(self.addr, addr_bits(self.addr) & mask)
    }

    /// Get the highest address in the block.
    pub fn hi(&self) -> IpAddr {
        broadcast_addr(self.addr, self.effective_mask()).unwrap_or(self.addr)
    }

    /// Number of addresses in the block, see [`block_size`].
    pub fn size(&self) -> Result<Option<u128>> {
        block_size(self.addr, self.mask).map_err(|_| FilterError::size(self.to_string()))
    }

    /// Check if an address is inside this block. Families must match.
    pub fn contains(&self, ip: IpAddr) -> bool {
        if ip.is_ipv4() != self.is_ipv4() {
            return false;
        }
        ip >= self.lo() && ip <= self.hi()
    }

    /// Check if this block lies entirely inside `parent`.
    pub fn is_subset_of(&self, parent: &Network) -> bool {
        self.is_ipv4() == parent.is_ipv4()
            && parent.mask <= self.mask
            && parent.contains(self.lo())
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
