//! Normalization of IP specifications into `start_ip-end_ip` ranges.
//!
//! Three input forms are recognized:
//! - CIDR (`66.249.64.0/27`) - expanded to network and broadcast address
//! - explicit range (`10.0.0.1-10.0.0.9`) - validated and passed through
//! - bare address (`10.0.0.5`) - emitted as a one-address range

use ipnet::Ipv4Net;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::{GoodBotsError, Result};

/// An inclusive IPv4 range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NormalizedRange {
    start: Ipv4Addr,
    end: Ipv4Addr,
}

impl NormalizedRange {
    /// Build a range, rejecting reversed endpoints.
    pub fn new(start: Ipv4Addr, end: Ipv4Addr) -> Result<Self> {
        if start > end {
            return Err(GoodBotsError::Parse {
                spec: format!("{}-{}", start, end),
                reason: "range start is greater than range end".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Ipv4Addr {
        self.start
    }

    pub fn end(&self) -> Ipv4Addr {
        self.end
    }

    /// Number of addresses covered by this range.
    pub fn len(&self) -> u64 {
        u64::from(u32::from(self.end)) - u64::from(u32::from(self.start)) + 1
    }

    /// A range always holds at least one address.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for NormalizedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for NormalizedRange {
    type Err = GoodBotsError;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s)
    }
}

impl From<Ipv4Net> for NormalizedRange {
    fn from(net: Ipv4Net) -> Self {
        Self {
            start: net.network(),
            end: net.broadcast(),
        }
    }
}

/// Normalize one IP specification.
///
/// CIDR blocks are parsed non-strictly: host bits below the prefix are
/// masked off, so `192.168.1.77/24` yields `192.168.1.0-192.168.1.255`.
///
/// # Examples
/// ```
/// use good_bots::range::normalize;
/// assert_eq!(normalize("192.168.1.0/24").unwrap().to_string(), "192.168.1.0-192.168.1.255");
/// assert_eq!(normalize("10.0.0.5").unwrap().to_string(), "10.0.0.5-10.0.0.5");
/// assert!(normalize("2001:db8::/32").is_err());
/// ```
pub fn normalize(spec: &str) -> Result<NormalizedRange> {
    let trimmed = spec.trim();

    if trimmed.contains('/') {
        let net: Ipv4Net = trimmed.parse().map_err(|_| parse_error(spec, "invalid IPv4 CIDR"))?;
        return Ok(NormalizedRange::from(net));
    }

    if let Some((start, end)) = trimmed.split_once('-') {
        let start = parse_addr(spec, start)?;
        let end = parse_addr(spec, end)?;
        if start > end {
            return Err(parse_error(spec, "range start is greater than range end"));
        }
        return Ok(NormalizedRange { start, end });
    }

    let addr = parse_addr(spec, trimmed)?;
    Ok(NormalizedRange {
        start: addr,
        end: addr,
    })
}

fn parse_addr(spec: &str, part: &str) -> Result<Ipv4Addr> {
    part.trim()
        .parse()
        .map_err(|_| parse_error(spec, "invalid IPv4 address"))
}

fn parse_error(spec: &str, reason: &str) -> GoodBotsError {
    GoodBotsError::Parse {
        spec: spec.to_string(),
        reason: reason.to_string(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ipv4_strategy() -> impl Strategy<Value = Ipv4Addr> {
        any::<u32>().prop_map(Ipv4Addr::from)
    }

    proptest! {
        /// CIDR bounds are the network and broadcast address of the prefix
        #[test]
        fn prop_cidr_bounds(addr in ipv4_strategy(), prefix in 0u8..=32) {
            let net = Ipv4Net::new(addr, prefix).unwrap();
            let range = normalize(&format!("{}/{}", addr, prefix)).unwrap();
            prop_assert_eq!(range.start(), net.network());
            prop_assert_eq!(range.end(), net.broadcast());
            prop_assert!(range.start() <= range.end());
        }

        /// A bare address becomes addr-addr
        #[test]
        fn prop_bare_address(addr in ipv4_strategy()) {
            let range = normalize(&addr.to_string()).unwrap();
            prop_assert_eq!(range.to_string(), format!("{}-{}", addr, addr));
        }

        /// Normalizing normalized output returns the same value
        #[test]
        fn prop_idempotent(addr in ipv4_strategy(), prefix in 0u8..=32) {
            let once = normalize(&format!("{}/{}", addr, prefix)).unwrap().to_string();
            let twice = normalize(&once).unwrap().to_string();
            prop_assert_eq!(once, twice);
        }

        /// Explicit ranges are accepted exactly when ordered
        #[test]
        fn prop_explicit_range_order(a in ipv4_strategy(), b in ipv4_strategy()) {
            let result = normalize(&format!("{}-{}", a, b));
            prop_assert_eq!(result.is_ok(), a <= b);
        }

        /// Arbitrary input never panics
        #[test]
        fn prop_arbitrary_no_panic(s in ".{0,40}") {
            let _ = normalize(&s);
        }
    }
}
