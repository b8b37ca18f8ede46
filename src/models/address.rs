//! Address families and text codecs.
//!
//! Provides the [`Family`] tag and the [`Address`] value type, a fixed-width
//! unsigned integer (32-bit for IPv4, 128-bit for IPv6), along with the
//! parse/format functions for dotted-quad and hextet notation, including
//! IPv6 `::` zero-run compression and expansion.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::CidrError;

/// Address family tag: IPv4 (32 bits) or IPv6 (128 bits).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Bit width of an address in this family.
    pub const fn bits(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// All-ones value within this family's bit width.
    pub const fn max_value(self) -> u128 {
        match self {
            Family::V4 => u32::MAX as u128,
            Family::V6 => u128::MAX,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// A single IP address: an opaque fixed-width unsigned integer plus its
/// family tag. Immutable once constructed; created by parsing text or by
/// arithmetic on another address of the same family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    family: Family,
    bits: u128,
}

impl Address {
    /// Build an address from raw bits. Callers must supply a value within
    /// the family's width; masked arithmetic inside the engine guarantees
    /// this.
    pub(crate) fn from_bits(family: Family, bits: u128) -> Address {
        debug_assert!(bits <= family.max_value(), "address bits exceed {family} width");
        Address { family, bits }
    }

    /// The family this address belongs to.
    pub fn family(&self) -> Family {
        self.family
    }

    /// The raw integer value (big-endian encoding of the octets/groups).
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// The address `n` positions after this one, or `None` if that would
    /// run past the family's address space.
    pub fn checked_add(&self, n: u128) -> Option<Address> {
        let bits = self.bits.checked_add(n)?;
        if bits > self.family.max_value() {
            return None;
        }
        Some(Address::from_bits(self.family, bits))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.family {
            Family::V4 => write!(f, "{}", format_ipv4(self)),
            Family::V6 => write!(f, "{}", abbreviate_ipv6(self)),
        }
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_address(&s).map_err(de::Error::custom)
    }
}

/// Parse an address of either family, dispatching on notation: text with a
/// colon is treated as IPv6, anything else as IPv4.
pub fn parse_address(text: &str) -> Result<Address, CidrError> {
    if text.contains(':') {
        parse_ipv6(text)
    } else {
        parse_ipv4(text)
    }
}

/// Parse an IPv4 dotted-quad address into a 32-bit [`Address`].
///
/// Requires exactly 4 decimal octets, each in [0, 255]. Any other shape is a
/// [`CidrError::MalformedAddress`] carrying the offending input; a partially
/// parsed value is never returned.
///
/// # Examples
/// ```
/// use subnet_engine::models::parse_ipv4;
/// assert_eq!(parse_ipv4("192.168.1.0").unwrap().bits(), 0xC0A80100);
/// assert!(parse_ipv4("192.168.1").is_err());
/// ```
pub fn parse_ipv4(text: &str) -> Result<Address, CidrError> {
    let malformed = || CidrError::MalformedAddress {
        family: Family::V4,
        input: text.to_string(),
    };

    let octets: Vec<&str> = text.split('.').collect();
    if octets.len() != 4 {
        return Err(malformed());
    }

    let mut bits: u32 = 0;
    for octet in octets {
        if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let value: u32 = octet.parse().map_err(|_| malformed())?;
        if value > 255 {
            return Err(malformed());
        }
        bits = (bits << 8) | value;
    }

    Ok(Address::from_bits(Family::V4, bits as u128))
}

/// Format a 32-bit [`Address`] as four dot-separated decimal octets.
pub fn format_ipv4(addr: &Address) -> String {
    debug_assert_eq!(addr.family(), Family::V4);
    let bits = addr.bits() as u32;
    format!(
        "{}.{}.{}.{}",
        (bits >> 24) & 0xFF,
        (bits >> 16) & 0xFF,
        (bits >> 8) & 0xFF,
        bits & 0xFF
    )
}

/// Parse one colon-separated hextet section. Empty text is an empty group
/// list (the side of a `::` can be empty); an empty group inside the text,
/// a group longer than 4 digits or a non-hex digit is `None`.
fn parse_hextets(text: &str) -> Option<Vec<u16>> {
    if text.is_empty() {
        return Some(Vec::new());
    }
    text.split(':')
        .map(|group| {
            if group.is_empty() || group.len() > 4 || !group.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return None;
            }
            u16::from_str_radix(group, 16).ok()
        })
        .collect()
}

/// Parse an IPv6 hextet address into a 128-bit [`Address`].
///
/// Supports the `::` zero-run shorthand (at most one occurrence); each
/// non-elided group is 1-4 hex digits and the implied zero groups bring the
/// total to 8. Two `::`, too many explicit groups or a non-hex digit is a
/// [`CidrError::MalformedAddress`].
pub fn parse_ipv6(text: &str) -> Result<Address, CidrError> {
    let malformed = || CidrError::MalformedAddress {
        family: Family::V6,
        input: text.to_string(),
    };

    let groups: Vec<u16> = match text.split_once("::") {
        Some((head, tail)) => {
            if tail.contains("::") {
                return Err(malformed());
            }
            let head = parse_hextets(head).ok_or_else(malformed)?;
            let tail = parse_hextets(tail).ok_or_else(malformed)?;
            // `::` stands for at least one zero group
            if head.len() + tail.len() > 7 {
                return Err(malformed());
            }
            let mut groups = head;
            groups.resize(8 - tail.len(), 0);
            groups.extend(tail);
            groups
        }
        None => {
            let groups = parse_hextets(text).ok_or_else(malformed)?;
            if groups.len() != 8 {
                return Err(malformed());
            }
            groups
        }
    };

    let bits = groups
        .iter()
        .fold(0u128, |acc, &group| (acc << 16) | group as u128);
    Ok(Address::from_bits(Family::V6, bits))
}

/// Split a 128-bit address into its 8 big-endian 16-bit groups.
fn ipv6_groups(addr: &Address) -> [u16; 8] {
    debug_assert_eq!(addr.family(), Family::V6);
    let bits = addr.bits();
    let mut groups = [0u16; 8];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = (bits >> (112 - 16 * i)) as u16;
    }
    groups
}

/// Fully expand a 128-bit [`Address`] to 8 groups of 4 lowercase hex
/// digits, colon-separated, no elision. This is the canonical form used for
/// comparison and display.
///
/// # Examples
/// ```
/// use subnet_engine::models::{expand_ipv6, parse_ipv6};
/// let addr = parse_ipv6("2001:db8::1").unwrap();
/// assert_eq!(expand_ipv6(&addr), "2001:0db8:0000:0000:0000:0000:0000:0001");
/// ```
pub fn expand_ipv6(addr: &Address) -> String {
    ipv6_groups(addr)
        .iter()
        .map(|group| format!("{:04x}", group))
        .collect::<Vec<String>>()
        .join(":")
}

/// Produce the canonical IPv6 shorthand: leading zeros stripped per group,
/// and the longest run of 2 or more consecutive zero groups replaced with
/// `::`. Ties for longest run go to the leftmost run; this tie-break is a
/// round-trip contract, not a display nicety.
pub fn abbreviate_ipv6(addr: &Address) -> String {
    let groups = ipv6_groups(addr);

    // Longest zero run of length >= 2, leftmost wins ties.
    let mut best: Option<(usize, usize)> = None; // (start, len)
    let mut i = 0;
    while i < 8 {
        if groups[i] == 0 {
            let start = i;
            while i < 8 && groups[i] == 0 {
                i += 1;
            }
            let len = i - start;
            if len >= 2 && best.map_or(true, |(_, best_len)| len > best_len) {
                best = Some((start, len));
            }
        } else {
            i += 1;
        }
    }

    let hex = |groups: &[u16]| {
        groups
            .iter()
            .map(|group| format!("{:x}", group))
            .collect::<Vec<String>>()
            .join(":")
    };

    match best {
        Some((start, len)) => format!("{}::{}", hex(&groups[..start]), hex(&groups[start + len..])),
        None => hex(&groups),
    }
}
