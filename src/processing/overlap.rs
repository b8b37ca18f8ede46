//! Overlap detection between CIDR networks.
//!
//! Two networks overlap iff their address ranges intersect. Mixed-family
//! comparisons are not meaningful and fail instead of silently returning
//! false.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::CidrError;
use crate::models::CidrNetwork;

/// Result record for a single pairwise overlap check. Pure computation,
/// recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapResult {
    pub a: CidrNetwork,
    pub b: CidrNetwork,
    pub overlaps: bool,
}

/// Whether the ranges of `a` and `b` intersect:
/// `a.network <= b.last && b.network <= a.last`.
///
/// Comparing an IPv4 network against an IPv6 one is
/// [`CidrError::IncompatibleFamily`].
pub fn overlaps(a: &CidrNetwork, b: &CidrNetwork) -> Result<bool, CidrError> {
    if a.family() != b.family() {
        return Err(CidrError::IncompatibleFamily(a.family(), b.family()));
    }
    Ok(a.network().bits() <= b.last_address().bits()
        && b.network().bits() <= a.last_address().bits())
}

/// Run [`overlaps`] and wrap the outcome in an [`OverlapResult`] record for
/// the presentation layer.
pub fn check(a: &CidrNetwork, b: &CidrNetwork) -> Result<OverlapResult, CidrError> {
    Ok(OverlapResult {
        a: *a,
        b: *b,
        overlaps: overlaps(a, b)?,
    })
}

/// Every pool member whose range intersects `candidate`, in pool order.
/// Used to check a new network against existing allocations; the pool is
/// plain caller data, never fetched by the engine.
pub fn find_overlaps_against_set(
    candidate: &CidrNetwork,
    pool: &[CidrNetwork],
) -> Result<Vec<CidrNetwork>, CidrError> {
    let mut hits = Vec::new();
    for member in pool {
        if overlaps(candidate, member)? {
            hits.push(*member);
        }
    }
    Ok(hits)
}

/// Overlap check over every unordered pair in a list.
pub fn pairwise(networks: &[CidrNetwork]) -> Result<Vec<OverlapResult>, CidrError> {
    networks
        .iter()
        .tuple_combinations()
        .map(|(a, b)| check(a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Family;

    fn net(cidr: &str) -> CidrNetwork {
        CidrNetwork::from_cidr(cidr).unwrap()
    }

    #[test]
    fn test_overlaps_scenarios() {
        assert!(!overlaps(&net("192.168.1.0/24"), &net("192.168.2.0/24")).unwrap());
        assert!(overlaps(&net("192.168.1.0/24"), &net("192.168.1.128/25")).unwrap());
        // adjacent but disjoint
        assert!(!overlaps(&net("10.0.0.0/25"), &net("10.0.0.128/25")).unwrap());
        // containment is overlap
        assert!(overlaps(&net("10.0.0.0/8"), &net("10.200.0.0/16")).unwrap());
    }

    #[test]
    fn test_overlaps_symmetry_and_reflexivity() {
        let a = net("10.0.0.0/16");
        let b = net("10.0.128.0/17");
        assert_eq!(overlaps(&a, &b).unwrap(), overlaps(&b, &a).unwrap());
        assert!(overlaps(&a, &a).unwrap());

        let c = net("172.16.0.0/12");
        assert_eq!(overlaps(&a, &c).unwrap(), overlaps(&c, &a).unwrap());
    }

    #[test]
    fn test_overlaps_v6() {
        assert!(overlaps(&net("2001:db8::/32"), &net("2001:db8:1::/48")).unwrap());
        assert!(!overlaps(&net("2001:db8::/48"), &net("2001:db9::/48")).unwrap());
    }

    #[test]
    fn test_mixed_family_is_an_error() {
        let err = overlaps(&net("10.0.0.0/8"), &net("2001:db8::/32")).unwrap_err();
        assert_eq!(err, CidrError::IncompatibleFamily(Family::V4, Family::V6));
    }

    #[test]
    fn test_check_record() {
        let a = net("10.0.0.0/24");
        let b = net("10.0.1.0/24");
        let result = check(&a, &b).unwrap();
        assert_eq!(result.a, a);
        assert_eq!(result.b, b);
        assert!(!result.overlaps);
    }

    #[test]
    fn test_find_overlaps_against_set() {
        let pool = vec![
            net("10.0.0.0/24"),
            net("10.0.1.0/24"),
            net("10.0.0.128/25"),
            net("10.1.0.0/16"),
        ];
        let hits = find_overlaps_against_set(&net("10.0.0.0/23"), &pool).unwrap();
        // pool order preserved
        assert_eq!(
            hits,
            vec![net("10.0.0.0/24"), net("10.0.1.0/24"), net("10.0.0.128/25")]
        );

        let none = find_overlaps_against_set(&net("172.16.0.0/16"), &pool).unwrap();
        assert!(none.is_empty());

        // a v6 member in a v4 pool fails rather than being skipped
        let mixed = vec![net("10.0.0.0/24"), net("2001:db8::/64")];
        assert!(find_overlaps_against_set(&net("10.0.0.0/16"), &mixed).is_err());
    }

    #[test]
    fn test_pairwise() {
        let networks = vec![net("10.0.0.0/24"), net("10.0.1.0/24"), net("10.0.0.64/26")];
        let results = pairwise(&networks).unwrap();
        assert_eq!(results.len(), 3);
        assert!(!results[0].overlaps); // 10.0.0.0/24 vs 10.0.1.0/24
        assert!(results[1].overlaps); // 10.0.0.0/24 vs 10.0.0.64/26
        assert!(!results[2].overlaps); // 10.0.1.0/24 vs 10.0.0.64/26
    }
}
