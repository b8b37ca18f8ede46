//! Supernet aggregation: smallest enclosing network of a list of CIDRs.

use serde::{Deserialize, Serialize};

use crate::error::CidrError;
use crate::models::CidrNetwork;

/// Aggregation result: the member networks as supplied plus the enclosing
/// supernet. Recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupernetResult {
    pub members: Vec<CidrNetwork>,
    pub aggregate: CidrNetwork,
}

/// Compute the smallest common-prefix supernet enclosing every member.
///
/// Needs at least 2 networks, all of the same family, else
/// [`CidrError::InvalidInput`].
///
/// The candidate prefix is the common-prefix length across *all* member
/// network addresses (the fold below is the minimum pairwise common prefix;
/// comparing only bounding extremes under-aggregates on unsorted input).
/// The candidate is then verified to contain every member's full range and
/// widened one bit at a time until it does; an interior member wider than
/// the common prefix of the addresses can force this.
pub fn aggregate(networks: &[CidrNetwork]) -> Result<SupernetResult, CidrError> {
    if networks.len() < 2 {
        return Err(CidrError::InvalidInput(format!(
            "supernet aggregation needs at least 2 networks, got {}",
            networks.len()
        )));
    }
    let family = networks[0].family();
    if let Some(other) = networks.iter().find(|n| n.family() != family) {
        return Err(CidrError::InvalidInput(format!(
            "supernet aggregation needs a single address family, got {} and {}",
            family,
            other.family()
        )));
    }

    // Common prefix of all member network addresses, in bits.
    let first = networks[0].network().bits();
    let diff = networks
        .iter()
        .fold(0u128, |acc, n| acc | (n.network().bits() ^ first));
    let width = family.bits() as u32;
    let common = diff.leading_zeros().saturating_sub(128 - width).min(width) as u8;

    let mut prefix_len = common;
    loop {
        let candidate = CidrNetwork::new(networks[0].network(), prefix_len)?;
        let contains_all = networks.iter().all(|n| {
            candidate.contains(&n.network()) && candidate.contains(&n.last_address())
        });
        if contains_all {
            log::debug!(
                "aggregated {} networks into {} (common prefix {}, final {})",
                networks.len(),
                candidate,
                common,
                prefix_len
            );
            return Ok(SupernetResult {
                members: networks.to_vec(),
                aggregate: candidate,
            });
        }
        if prefix_len == 0 {
            return Err(CidrError::CannotAggregate);
        }
        prefix_len -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(cidr: &str) -> CidrNetwork {
        CidrNetwork::from_cidr(cidr).unwrap()
    }

    #[test]
    fn test_aggregate_sibling_halves() {
        let result = aggregate(&[net("10.0.0.0/25"), net("10.0.0.128/25")]).unwrap();
        assert_eq!(result.aggregate, net("10.0.0.0/24"));
        assert_eq!(result.members.len(), 2);
    }

    #[test]
    fn test_aggregate_non_adjacent() {
        // 10.0.0.0 and 10.0.2.0 share 22 bits; /22 covers the gap too
        let result = aggregate(&[net("10.0.0.0/24"), net("10.0.2.0/24")]).unwrap();
        assert_eq!(result.aggregate, net("10.0.0.0/22"));
    }

    #[test]
    fn test_aggregate_unsorted_interior_member() {
        // the first and last list entries alone would suggest /22; the
        // middle member 10.0.4.0/24 forces /21
        let result = aggregate(&[
            net("10.0.3.0/24"),
            net("10.0.4.0/24"),
            net("10.0.0.0/24"),
        ])
        .unwrap();
        assert_eq!(result.aggregate, net("10.0.0.0/21"));
    }

    #[test]
    fn test_aggregate_widens_for_wide_member() {
        // address common prefix is /15, but the /8 member's range forces
        // widening back to /8
        let result = aggregate(&[net("10.0.0.0/8"), net("10.1.0.0/16")]).unwrap();
        assert_eq!(result.aggregate, net("10.0.0.0/8"));
    }

    #[test]
    fn test_aggregate_identical_members() {
        let result = aggregate(&[net("192.168.1.0/24"), net("192.168.1.0/24")]).unwrap();
        assert_eq!(result.aggregate, net("192.168.1.0/24"));
    }

    #[test]
    fn test_aggregate_whole_space() {
        // nothing shared: only /0 encloses both
        let result = aggregate(&[net("0.0.0.0/8"), net("255.0.0.0/8")]).unwrap();
        assert_eq!(result.aggregate, net("0.0.0.0/0"));
    }

    #[test]
    fn test_aggregate_v6() {
        let result = aggregate(&[net("2001:db8::/33"), net("2001:db8:8000::/33")]).unwrap();
        assert_eq!(result.aggregate, net("2001:db8::/32"));
    }

    #[test]
    fn test_aggregate_contains_every_member() {
        let members = [
            net("172.16.4.0/24"),
            net("172.16.9.0/24"),
            net("172.16.5.128/25"),
        ];
        let result = aggregate(&members).unwrap();
        for member in &members {
            assert!(result.aggregate.contains(&member.network()), "{member} escapes");
            assert!(result.aggregate.contains(&member.last_address()), "{member} escapes");
        }
    }

    #[test]
    fn test_aggregate_invalid_input() {
        assert!(matches!(
            aggregate(&[]).unwrap_err(),
            CidrError::InvalidInput(_)
        ));
        assert!(matches!(
            aggregate(&[net("10.0.0.0/24")]).unwrap_err(),
            CidrError::InvalidInput(_)
        ));
        assert!(matches!(
            aggregate(&[net("10.0.0.0/24"), net("2001:db8::/64")]).unwrap_err(),
            CidrError::InvalidInput(_)
        ));
    }
}
