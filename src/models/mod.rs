//! Value types of the computation engine.
//!
//! This module contains the core data structures consumed everywhere else:
//! - [`Family`] and [`Address`] - fixed-width address representation and
//!   text codecs (dotted-quad, hextet, `::` compression)
//! - [`CidrNetwork`] - a CIDR network with its derived boundary fields

mod address;
mod network;

// Re-export public types
pub use address::{
    abbreviate_ipv6, expand_ipv6, format_ipv4, parse_address, parse_ipv4, parse_ipv6, Address,
    Family,
};
pub use network::{prefix_mask, CidrNetwork, Ipv4Class, NetworkType};
