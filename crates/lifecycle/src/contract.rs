//! Bindings for the subset of the DataAvailabilityChallenge contract the
//! manager consumes: the `ChallengeStatusChanged` event and the `resolve`
//! calldata carrying the pre-image.

use alloy_primitives::{Bytes, Log, B256};
use alloy_sol_types::{sol, SolCall, SolEvent};
use altda_commitment::Commitment;

use crate::errors::EventDecodeError;

sol! {
    /// Emitted whenever a challenge transitions status on-chain.
    event ChallengeStatusChanged(uint256 indexed challengedBlockNumber, bytes challengedCommitment, uint8 status);

    /// Posts the pre-image for a challenged commitment. Only `resolveData`
    /// is of interest here; the surrounding fields are re-checked against
    /// the store's own records.
    function resolve(uint256 challengedBlockNumber, bytes calldata challengedCommitment, bytes calldata resolveData);
}

/// Topic-0 of the [ChallengeStatusChanged] event.
pub const CHALLENGE_STATUS_EVENT_TOPIC: B256 = ChallengeStatusChanged::SIGNATURE_HASH;

/// A decoded [ChallengeStatusChanged] event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedChallenge {
    /// L1 block number at which the challenged commitment was included in
    /// batch-inbox calldata.
    pub comm_block_number: u64,
    /// The challenged commitment, re-parsed with the codec.
    pub commitment: Commitment,
    /// Raw on-chain status code; unknown values are the caller's problem.
    pub status: u8,
}

/// Decodes a [ChallengeStatusChanged] event out of a log whose topic-0 has
/// already been matched by the caller.
pub fn decode_challenge_event(log: &Log) -> Result<DecodedChallenge, EventDecodeError> {
    let event = ChallengeStatusChanged::decode_log_data(&log.data)?;
    let comm_block_number = u64::try_from(event.challengedBlockNumber)
        .map_err(|_| EventDecodeError::BlockNumberOverflow)?;
    let commitment = Commitment::decode(&event.challengedCommitment)?;
    Ok(DecodedChallenge { comm_block_number, commitment, status: event.status })
}

/// Recovers the pre-image from a resolve transaction's calldata.
pub fn decode_resolved_input(data: &[u8]) -> Result<Bytes, EventDecodeError> {
    let call = resolveCall::abi_decode(data)?;
    if call.resolveData.is_empty() {
        return Err(EventDecodeError::EmptyResolveData);
    }
    Ok(call.resolveData)
}
