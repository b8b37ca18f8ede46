//! Pure IP-address-space computation engine.
//!
//! Parses CIDR notation (IPv4 and IPv6) into [`CidrNetwork`] value objects
//! with derived boundaries, masks, host counts and classification, and
//! computes over them: VLSM allocation ([`allocate`]), overlap detection
//! ([`overlaps`], [`find_overlaps_against_set`]) and supernet aggregation
//! ([`aggregate`]).
//!
//! Every operation is a pure function of its inputs: no I/O, no shared
//! mutable state, no retries. A call yields either a fully populated value
//! object or exactly one [`CidrError`] kind, never a partial result. The
//! presentation layer supplies raw strings and host counts and renders
//! whatever structured record comes back.
//!
//! ```
//! use subnet_engine::{allocate, CidrNetwork, SubnetRequest};
//!
//! let base = CidrNetwork::from_cidr("192.168.1.0/24").unwrap();
//! assert_eq!(base.usable_hosts(), 254);
//!
//! let plan = allocate(&base, &[SubnetRequest::new("engineering", 50)]).unwrap();
//! assert_eq!(plan[0].network.to_string(), "192.168.1.0/26");
//! ```

pub mod error;
pub mod models;
pub mod processing;

pub use error::CidrError;
pub use models::{Address, CidrNetwork, Family, Ipv4Class, NetworkType};
pub use processing::{
    aggregate, allocate, find_overlaps_against_set, overlaps, AllocatedSubnet, OverlapResult,
    SubnetRequest, SupernetResult,
};
