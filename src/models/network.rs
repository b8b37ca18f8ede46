//! CIDR network value type and subnet mask utilities.
//!
//! A [`CidrNetwork`] is constructed once from `address/prefix` text (or a
//! parsed [`Address`]) and is read-only thereafter: the subnet mask,
//! wildcard mask and last address are derived at construction and the
//! network address is silently normalized to the network base.

use lazy_static::lazy_static;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::CidrError;
use crate::models::{parse_address, Address, Family};

lazy_static! {
    /// Shape check for CIDR text: an address part and a 1-3 digit prefix.
    static ref CIDR_RE: Regex = Regex::new(r"^(?P<addr>[^/\s]+)/(?P<prefix>\d{1,3})$")
        .expect("CIDR regex is valid");

    /// IPv4 class ranges by first octet. Octets 0 and 127 intentionally
    /// fall outside every class (loopback is not folded into Class A).
    static ref CLASS_RANGES: Vec<(RangeInclusive<u8>, Ipv4Class)> = vec![
        (1..=126, Ipv4Class::A),
        (128..=191, Ipv4Class::B),
        (192..=223, Ipv4Class::C),
        (224..=239, Ipv4Class::D),
        (240..=255, Ipv4Class::E),
    ];
}

/// Convert a prefix length to a subnet mask within the family's bit width:
/// the top `prefix_len` bits set, the rest clear.
///
/// # Examples
/// ```
/// use subnet_engine::models::{prefix_mask, Family};
/// assert_eq!(prefix_mask(Family::V4, 24).unwrap().bits(), 0xFFFFFF00);
/// ```
pub fn prefix_mask(family: Family, prefix_len: u8) -> Result<Address, CidrError> {
    if prefix_len > family.bits() {
        return Err(CidrError::InvalidPrefixLength {
            input: format!("/{prefix_len}"),
            max: family.bits(),
        });
    }
    let bits = if prefix_len == 0 {
        0
    } else {
        let host_bits = family.bits() - prefix_len;
        (family.max_value() >> host_bits) << host_bits
    };
    Ok(Address::from_bits(family, bits))
}

/// IPv4 address class by first octet (informational).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ipv4Class {
    A,
    B,
    C,
    D,
    E,
}

impl fmt::Display for Ipv4Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ipv4Class::A => write!(f, "A"),
            Ipv4Class::B => write!(f, "B"),
            Ipv4Class::C => write!(f, "C"),
            Ipv4Class::D => write!(f, "D"),
            Ipv4Class::E => write!(f, "E"),
        }
    }
}

/// IPv4 address scope (informational).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Private,
    Multicast,
    Public,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetworkType::Private => write!(f, "private"),
            NetworkType::Multicast => write!(f, "multicast"),
            NetworkType::Public => write!(f, "public"),
        }
    }
}

/// An IP network in CIDR notation with its derived boundary fields.
///
/// Invariant: `network == raw_address & subnet_mask`: constructing from an
/// arbitrary host address normalizes to the network base.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CidrNetwork {
    family: Family,
    network: Address,
    prefix_len: u8,
    subnet_mask: Address,
    wildcard_mask: Address,
    last: Address,
}

impl CidrNetwork {
    /// Parse a `address/prefix` string (e.g. "10.0.0.0/24", "2001:db8::/64").
    ///
    /// A missing `/`, a non-numeric prefix or a prefix outside
    /// `[0, family_bits]` is [`CidrError::InvalidPrefixLength`]; an address
    /// that does not parse propagates as [`CidrError::MalformedAddress`].
    pub fn from_cidr(text: &str) -> Result<CidrNetwork, CidrError> {
        let text = text.trim();
        // family is unknown until the address parses; guess by notation for
        // the error message
        let guessed_max = if text.contains(':') { 128 } else { 32 };
        let caps = CIDR_RE
            .captures(text)
            .ok_or_else(|| CidrError::InvalidPrefixLength {
                input: text.to_string(),
                max: guessed_max,
            })?;

        let addr = parse_address(&caps["addr"])?;
        let prefix_len: u8 =
            caps["prefix"]
                .parse()
                .map_err(|_| CidrError::InvalidPrefixLength {
                    input: text.to_string(),
                    max: addr.family().bits(),
                })?;
        if prefix_len > addr.family().bits() {
            return Err(CidrError::InvalidPrefixLength {
                input: text.to_string(),
                max: addr.family().bits(),
            });
        }

        CidrNetwork::new(addr, prefix_len)
    }

    /// Build a network from an already parsed address and prefix length,
    /// normalizing the address to the network base.
    pub fn new(addr: Address, prefix_len: u8) -> Result<CidrNetwork, CidrError> {
        let family = addr.family();
        let subnet_mask = prefix_mask(family, prefix_len)?;
        let network = Address::from_bits(family, addr.bits() & subnet_mask.bits());
        let wildcard_mask =
            Address::from_bits(family, !subnet_mask.bits() & family.max_value());
        let last = Address::from_bits(family, network.bits() | wildcard_mask.bits());

        Ok(CidrNetwork {
            family,
            network,
            prefix_len,
            subnet_mask,
            wildcard_mask,
            last,
        })
    }

    /// The address family of this network.
    pub fn family(&self) -> Family {
        self.family
    }

    /// The network (base) address.
    pub fn network(&self) -> Address {
        self.network
    }

    /// The prefix length.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// The subnet mask (top `prefix_len` bits set).
    pub fn subnet_mask(&self) -> Address {
        self.subnet_mask
    }

    /// The wildcard mask (bitwise NOT of the subnet mask within the family
    /// width).
    pub fn wildcard_mask(&self) -> Address {
        self.wildcard_mask
    }

    /// The broadcast address. IPv4 only; IPv6 has no broadcast concept, so
    /// this is `None` for v6; use [`CidrNetwork::last_address`] instead.
    pub fn broadcast(&self) -> Option<Address> {
        match self.family {
            Family::V4 => Some(self.last),
            Family::V6 => None,
        }
    }

    /// The highest address in the network's range.
    pub fn last_address(&self) -> Address {
        self.last
    }

    /// Number of host bits (`family_bits - prefix_len`).
    pub fn host_bits(&self) -> u8 {
        self.family.bits() - self.prefix_len
    }

    /// Total addresses in the range (`2^host_bits`). Saturates at
    /// `u128::MAX` for the IPv6 /0 corner, which has 2^128 addresses.
    pub fn total_addresses(&self) -> u128 {
        1u128
            .checked_shl(self.host_bits() as u32)
            .unwrap_or(u128::MAX)
    }

    /// Usable host addresses. IPv4 reserves the network and broadcast
    /// addresses except for /31 (point-to-point, 2 hosts) and /32 (host
    /// route, 1 host); IPv6 reserves nothing.
    pub fn usable_hosts(&self) -> u128 {
        match self.family {
            Family::V6 => self.total_addresses(),
            Family::V4 => match self.prefix_len {
                32 => 1,
                31 => 2,
                _ => self.total_addresses() - 2,
            },
        }
    }

    /// IPv4 address class by first octet. `None` for IPv6 and for first
    /// octets 0 and 127, which the documented ranges leave unclassified.
    pub fn class(&self) -> Option<Ipv4Class> {
        if self.family != Family::V4 {
            return None;
        }
        let first = (self.network.bits() >> 24) as u8;
        CLASS_RANGES
            .iter()
            .find(|(range, _)| range.contains(&first))
            .map(|(_, class)| *class)
    }

    /// IPv4 address scope: private (10/8, 172.16/12, 192.168/16),
    /// multicast (224-239) or public. `None` for IPv6.
    pub fn network_type(&self) -> Option<NetworkType> {
        if self.family != Family::V4 {
            return None;
        }
        let bits = self.network.bits() as u32;
        let first = (bits >> 24) as u8;
        let second = (bits >> 16) as u8;

        let network_type = if first == 10
            || (first == 172 && (16..=31).contains(&second))
            || (first == 192 && second == 168)
        {
            NetworkType::Private
        } else if (224..=239).contains(&first) {
            NetworkType::Multicast
        } else {
            NetworkType::Public
        };
        Some(network_type)
    }

    /// Whether an address of the same family falls within this network's
    /// range. Always false for a mismatched family.
    pub fn contains(&self, addr: &Address) -> bool {
        addr.family() == self.family
            && self.network.bits() <= addr.bits()
            && addr.bits() <= self.last.bits()
    }
}

impl fmt::Display for CidrNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

impl Serialize for CidrNetwork {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CidrNetwork {
    fn deserialize<D>(deserializer: D) -> Result<CidrNetwork, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CidrNetwork::from_cidr(&s).map_err(de::Error::custom)
    }
}
