//! Algorithms over the network value types.
//!
//! This module contains the computation logic of the engine:
//! - [`vlsm`] - variable-length subnet allocation
//! - [`overlap`] - pairwise and set overlap detection
//! - [`supernet`] - common-prefix supernet aggregation

mod overlap;
mod supernet;
mod vlsm;

// Re-export public functions and result records
pub use overlap::{check, find_overlaps_against_set, overlaps, pairwise, OverlapResult};
pub use supernet::{aggregate, SupernetResult};
pub use vlsm::{allocate, AllocatedSubnet, SubnetRequest};
