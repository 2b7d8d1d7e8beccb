//! Configuration for the alt-da manager.

use alloy_primitives::Address;
use altda_commitment::CommitmentType;

/// The relevant subset of the rollup config for alt-da derivation. Immutable
/// for the life of the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltDaConfig {
    /// Address of the DataAvailabilityChallenge contract, used to filter
    /// challenge events.
    pub da_challenge_contract: Address,
    /// The only commitment variant the manager accepts from the pipeline.
    pub commitment_type: CommitmentType,
    /// The number of L1 blocks after the input is committed during which one
    /// can challenge.
    pub challenge_window: u64,
    /// The number of L1 blocks after a commitment is challenged during which
    /// one can resolve.
    pub resolve_window: u64,
}
