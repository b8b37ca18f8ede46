//! Variable-length subnet mask (VLSM) allocation.
//!
//! Given a base network and a list of named host-count requirements,
//! computes the minimal-prefix subnet for each requirement and lays them
//! out contiguously, largest requirement first, without overlap.

use serde::{Deserialize, Serialize};

use crate::error::CidrError;
use crate::models::{Address, CidrNetwork, Family};

/// A named host-count requirement supplied by the caller. Never mutated by
/// the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetRequest {
    /// Caller-chosen label for the requirement.
    pub name: String,
    /// Number of host addresses the subnet must provide.
    pub required_hosts: u128,
}

impl SubnetRequest {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, required_hosts: u128) -> SubnetRequest {
        SubnetRequest {
            name: name.into(),
            required_hosts,
        }
    }
}

/// One placed subnet, produced per [`SubnetRequest`]. Keeps a back-reference
/// to its originating request so a caller can re-sort freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedSubnet {
    /// The request this block satisfies.
    pub request: SubnetRequest,
    /// The allocated network.
    pub network: CidrNetwork,
    /// Usable host addresses in the block.
    pub usable_hosts: u128,
    /// `required_hosts / usable_hosts`.
    pub efficiency: f64,
}

/// Prefix length of the smallest block holding `required_hosts` hosts, with
/// the network+broadcast reservation of the usable-host convention. A
/// zero-host request gets a host route (/32 or /128). `None` when no prefix
/// in the family can hold the request.
fn prefix_for_hosts(family: Family, required_hosts: u128) -> Option<u8> {
    if required_hosts == 0 {
        return Some(family.bits());
    }
    let needed = required_hosts.checked_add(2)?;
    // ceil(log2(needed)); needed >= 2 here
    let required_bits = (128 - (needed - 1).leading_zeros()) as u8;
    if required_bits > family.bits() {
        return None;
    }
    Some(family.bits() - required_bits)
}

/// Allocate a subnet for every request inside `base`.
///
/// Requests are packed best-fit-first: stable-sorted by `required_hosts`
/// descending (ties keep their original relative order) and placed at a
/// cursor advancing from the base network address, each block starting
/// right after the previous block's last address. Results come back in the
/// *original* request order.
///
/// Fails with [`CidrError::InsufficientAddressSpace`], naming the request
/// that could not be placed, as soon as a block will not fit; no partial
/// allocation is returned.
pub fn allocate(
    base: &CidrNetwork,
    requests: &[SubnetRequest],
) -> Result<Vec<AllocatedSubnet>, CidrError> {
    let family = base.family();
    let insufficient = |request: &SubnetRequest| CidrError::InsufficientAddressSpace {
        base: base.to_string(),
        request: request.name.clone(),
        required_hosts: request.required_hosts,
    };

    // Stable sort, largest requirement first.
    let mut order: Vec<usize> = (0..requests.len()).collect();
    order.sort_by(|&a, &b| requests[b].required_hosts.cmp(&requests[a].required_hosts));

    let mut placed: Vec<Option<AllocatedSubnet>> = vec![None; requests.len()];
    // None once the cursor has run off the end of the family's space.
    let mut cursor: Option<Address> = Some(base.network());

    for &idx in &order {
        let request = &requests[idx];
        let prefix_len =
            prefix_for_hosts(family, request.required_hosts).ok_or_else(|| insufficient(request))?;
        if prefix_len < base.prefix_len() {
            // block larger than the whole base network
            return Err(insufficient(request));
        }

        let start = cursor.ok_or_else(|| insufficient(request))?;
        let block = CidrNetwork::new(start, prefix_len)?;
        // descending sizes keep the cursor aligned for every later block
        debug_assert_eq!(block.network(), start, "cursor fell out of alignment");
        if block.last_address().bits() > base.last_address().bits() {
            return Err(insufficient(request));
        }

        let usable_hosts = block.usable_hosts();
        log::debug!(
            "placed '{}' at {} ({} of {} hosts used)",
            request.name,
            block,
            request.required_hosts,
            usable_hosts
        );

        cursor = block.last_address().checked_add(1);
        placed[idx] = Some(AllocatedSubnet {
            request: request.clone(),
            network: block,
            usable_hosts,
            efficiency: request.required_hosts as f64 / usable_hosts as f64,
        });
    }

    // every slot was filled above; emit in original request order
    Ok(placed.into_iter().flatten().collect())
}
