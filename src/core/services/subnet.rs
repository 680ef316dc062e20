//! Subnet classifier - decides whether two addresses are co-located
//!
//! Co-location is a proxy for "physically in the classroom": the requesting
//! device must share the classroom router's network prefix. Every failure
//! mode (malformed address, mixed families, oversized mask) classifies as
//! *not* co-located.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::{Deserialize, Serialize};

/// Default IPv4 prefix length
pub const DEFAULT_MASK_BITS: u8 = 24;

/// Default IPv6 prefix length
pub const DEFAULT_IPV6_PREFIX: u8 = 64;

/// Co-location policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetPolicy {
    /// IPv4 prefix length compared
    pub mask_bits: u8,
    /// IPv6 prefix length compared
    pub ipv6_prefix: u8,
    /// Treat loopback requesters as co-located (development only)
    pub allow_loopback: bool,
}

impl Default for SubnetPolicy {
    fn default() -> Self {
        Self {
            mask_bits: DEFAULT_MASK_BITS,
            ipv6_prefix: DEFAULT_IPV6_PREFIX,
            allow_loopback: false,
        }
    }
}

impl SubnetPolicy {
    /// Whether `requester` is co-located with `classroom`
    ///
    /// With `allow_loopback`, a loopback or `localhost` requester is always
    /// co-located. Otherwise both addresses must share a network prefix.
    #[must_use]
    pub fn co_located(&self, requester: &str, classroom: &str) -> bool {
        if self.allow_loopback && is_loopback(requester) {
            return true;
        }
        self.same_network(requester, classroom)
    }

    /// Prefix comparison without the loopback escape hatch
    #[must_use]
    pub fn same_network(&self, a: &str, b: &str) -> bool {
        match (parse(a), parse(b)) {
            (Some(IpAddr::V4(a)), Some(IpAddr::V4(b))) => {
                match (prefix_v4(a, self.mask_bits), prefix_v4(b, self.mask_bits)) {
                    (Some(pa), Some(pb)) => pa == pb,
                    _ => false,
                }
            },
            (Some(IpAddr::V6(a)), Some(IpAddr::V6(b))) => {
                match (prefix_v6(a, self.ipv6_prefix), prefix_v6(b, self.ipv6_prefix)) {
                    (Some(pa), Some(pb)) => pa == pb,
                    _ => false,
                }
            },
            _ => false,
        }
    }
}

/// Whether two addresses share the same IPv4 prefix of `mask_bits` bits
///
/// IPv6 pairs are compared under the default /64 prefix. Loopback gets no
/// special treatment here; see [`SubnetPolicy::co_located`].
#[must_use]
pub fn same_subnet(a: &str, b: &str, mask_bits: u8) -> bool {
    SubnetPolicy {
        mask_bits,
        ..SubnetPolicy::default()
    }
    .same_network(a, b)
}

/// Whether an address names the local host
#[must_use]
pub fn is_loopback(addr: &str) -> bool {
    addr.trim().eq_ignore_ascii_case("localhost") || parse(addr).is_some_and(|ip| ip.is_loopback())
}

/// Parse an address, unwrapping IPv4-mapped IPv6 forms to plain IPv4
fn parse(addr: &str) -> Option<IpAddr> {
    addr.trim().parse::<IpAddr>().ok().map(|ip| ip.to_canonical())
}

fn prefix_v4(ip: Ipv4Addr, bits: u8) -> Option<u32> {
    let mask = match bits {
        0 => 0,
        1..=32 => u32::MAX << (32 - u32::from(bits)),
        _ => return None,
    };
    Some(u32::from(ip) & mask)
}

fn prefix_v6(ip: Ipv6Addr, bits: u8) -> Option<u128> {
    let mask = match bits {
        0 => 0,
        1..=128 => u128::MAX << (128 - u32::from(bits)),
        _ => return None,
    };
    Some(u128::from(ip) & mask)
}
