//! Errors for parsing and verifying alt-da commitments.

/// Failure modes of the commitment codec.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum CommitmentError {
    /// The encoded commitment is empty or its body violates the variant's
    /// length rules.
    #[error("invalid commitment")]
    Invalid,
    /// The type tag does not name a known commitment variant.
    #[error("unknown commitment type: {0}")]
    UnknownType(u8),
    /// The recomputed digest does not match the commitment.
    #[error("commitment does not match the given input")]
    Mismatch,
}
