//! Typed errors for the computation engine.
//!
//! Every public operation returns either a fully populated value or exactly
//! one of these kinds. Nothing is retried and no partial result is ever
//! handed back; turning an error into a user-visible message is the
//! presentation layer's job.

use thiserror::Error;

use crate::models::Family;

/// Error kinds surfaced by the engine. All are fatal to the single call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrError {
    /// Text does not parse as a valid address of the stated family.
    /// Carries the offending input.
    #[error("malformed {family} address: '{input}'")]
    MalformedAddress { family: Family, input: String },

    /// Prefix length missing or outside `[0, family_bits]`.
    #[error("invalid prefix length in '{input}': must be 0-{max}")]
    InvalidPrefixLength { input: String, max: u8 },

    /// An operation received a mix of IPv4 and IPv6 where both must match.
    #[error("incompatible address families: {0} vs {1}")]
    IncompatibleFamily(Family, Family),

    /// A VLSM request cannot be placed within the remaining base network.
    #[error("insufficient address space in {base} for request '{request}' ({required_hosts} hosts)")]
    InsufficientAddressSpace {
        base: String,
        request: String,
        required_hosts: u128,
    },

    /// Fewer than the minimum required networks supplied to a set operation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No enclosing prefix within the family's bit width satisfies
    /// containment. Only reachable on inconsistent input.
    #[error("cannot aggregate: no enclosing prefix contains all member networks")]
    CannotAggregate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CidrError::MalformedAddress {
            family: Family::V4,
            input: "10.0.0".to_string(),
        };
        assert_eq!(err.to_string(), "malformed IPv4 address: '10.0.0'");

        let err = CidrError::InvalidPrefixLength {
            input: "10.0.0.0/33".to_string(),
            max: 32,
        };
        assert_eq!(
            err.to_string(),
            "invalid prefix length in '10.0.0.0/33': must be 0-32"
        );

        let err = CidrError::IncompatibleFamily(Family::V4, Family::V6);
        assert_eq!(
            err.to_string(),
            "incompatible address families: IPv4 vs IPv6"
        );
    }
}
