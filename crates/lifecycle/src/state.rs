//! In-memory state tracking the commitments and challenges observed on the
//! parent chain.
//!
//! Commitments are challengeable until their challenge window closes;
//! challenges are resolvable until their resolve window closes. Both live in
//! FIFO queues ordered by expiry height and are retired in two steps: first
//! moved to an expired queue once their window closes relative to the latest
//! seen origin, then pruned for good once the L1 finality signal passes the
//! same height. Challenge records themselves are owned by an index keyed by
//! `(commitment inclusion block, encoded commitment)` so that a record stays
//! reachable while entries migrate between queues.

use alloc::collections::VecDeque;
use alloy_eips::BlockNumHash;
use alloy_primitives::{map::HashMap, Bytes};
use altda_commitment::Commitment;
use kona_protocol::BlockInfo;
use tracing::warn;

use crate::{config::AltDaConfig, errors::AltDaError};

/// Lifecycle status of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// No challenge record exists for the commitment.
    Uninitialized,
    /// The commitment was challenged and the resolve window is open.
    Active,
    /// The pre-image was posted on-chain before the resolve window closed.
    Resolved,
    /// The resolve window closed without a resolution.
    Expired,
}

impl TryFrom<u8> for ChallengeStatus {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Active),
            2 => Ok(Self::Resolved),
            3 => Ok(Self::Expired),
            s => Err(s),
        }
    }
}

/// A commitment observed in batch-inbox calldata, tracked until its window
/// closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedCommitment {
    /// The commitment itself.
    pub data: Commitment,
    /// The L1 block in whose batch-inbox calldata the commitment appeared.
    pub inclusion_block: BlockInfo,
    /// Last L1 block at which the commitment can still be challenged.
    pub challenge_window_end: u64,
}

/// A challenge observed on the DA challenge contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// The challenged commitment.
    pub commitment: Commitment,
    /// L1 block number at which the challenged commitment was included.
    pub comm_inclusion_block_number: u64,
    /// Last L1 block at which the challenge can still be resolved. Measured
    /// from the challenge inclusion block, not the commitment inclusion
    /// block.
    pub resolve_window_end: u64,
    /// The pre-image recovered from the resolve transaction, if resolved.
    pub input: Option<Bytes>,
    /// Current status.
    pub status: ChallengeStatus,
}

/// The canonical identifier of a challenge. The commitment alone is not
/// sufficient: the same commitment may appear at several inclusion heights.
pub type ChallengeKey = (u64, Bytes);

fn challenge_key(commitment: &Commitment, comm_block_number: u64) -> ChallengeKey {
    (comm_block_number, commitment.encode())
}

/// A queue entry pointing at an indexed challenge record. The window end is
/// snapshotted at insertion so queue order survives a later overwrite of the
/// index binding.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ChallengeRef {
    resolve_window_end: u64,
    key: ChallengeKey,
}

/// The alt-da state store. All operations are synchronous and perform no I/O.
#[derive(Debug, Clone)]
pub struct State {
    commitments: VecDeque<TrackedCommitment>,
    expired_commitments: VecDeque<TrackedCommitment>,
    challenges: VecDeque<ChallengeRef>,
    expired_challenges: VecDeque<ChallengeRef>,
    challenges_index: HashMap<ChallengeKey, Challenge>,
    last_pruned_commitment: Option<BlockInfo>,
    cfg: AltDaConfig,
}

impl State {
    /// Creates an empty store for the given config.
    pub fn new(cfg: AltDaConfig) -> Self {
        Self {
            commitments: VecDeque::new(),
            expired_commitments: VecDeque::new(),
            challenges: VecDeque::new(),
            expired_challenges: VecDeque::new(),
            challenges_index: HashMap::default(),
            last_pruned_commitment: None,
            cfg,
        }
    }

    /// The inclusion block of the most recently pruned commitment, i.e. the
    /// latest reference promoted to the pipeline finalized pointer.
    pub const fn last_pruned_commitment(&self) -> Option<BlockInfo> {
        self.last_pruned_commitment
    }

    /// Appends a tracked commitment. Callers guarantee non-descending
    /// inclusion-block numbers across calls; duplicate tracks yield duplicate
    /// entries and are deduplicated by callers consulting the status first.
    pub fn track_commitment(&mut self, data: Commitment, inclusion_block: BlockInfo) {
        let challenge_window_end = inclusion_block.number + self.cfg.challenge_window;
        self.commitments.push_back(TrackedCommitment {
            data,
            inclusion_block,
            challenge_window_end,
        });
    }

    /// Records an active challenge for the commitment included at
    /// `comm_block_number`, challenged in `inclusion_block`. A duplicate key
    /// overwrites the index binding: the contract enforces uniqueness
    /// on-chain, so the freshest event is authoritative.
    pub fn create_challenge(
        &mut self,
        commitment: Commitment,
        inclusion_block: BlockNumHash,
        comm_block_number: u64,
    ) {
        let key = challenge_key(&commitment, comm_block_number);
        let resolve_window_end = inclusion_block.number + self.cfg.resolve_window;
        if self.challenges_index.contains_key(&key) {
            warn!(
                target: "altda-state",
                comm_block = comm_block_number,
                challenge_block = inclusion_block.number,
                "overwriting existing challenge record"
            );
        }
        self.challenges.push_back(ChallengeRef { resolve_window_end, key: key.clone() });
        self.challenges_index.insert(
            key,
            Challenge {
                commitment,
                comm_inclusion_block_number: comm_block_number,
                resolve_window_end,
                input: None,
                status: ChallengeStatus::Active,
            },
        );
    }

    /// Marks the challenge for the given key as resolved, storing the
    /// recovered pre-image. Fails if no challenge record exists.
    pub fn resolve_challenge(
        &mut self,
        commitment: &Commitment,
        comm_block_number: u64,
        input: Option<Bytes>,
    ) -> Result<(), AltDaError> {
        let key = challenge_key(commitment, comm_block_number);
        match self.challenges_index.get_mut(&key) {
            Some(challenge) => {
                challenge.input = input;
                challenge.status = ChallengeStatus::Resolved;
                Ok(())
            }
            None => Err(AltDaError::UntrackedChallenge),
        }
    }

    /// Looks up the challenge record for the commitment included at
    /// `comm_block_number`.
    pub fn get_challenge(
        &self,
        commitment: &Commitment,
        comm_block_number: u64,
    ) -> Option<&Challenge> {
        self.challenges_index.get(&challenge_key(commitment, comm_block_number))
    }

    /// The status of the challenge for the given key;
    /// [ChallengeStatus::Uninitialized] when no record exists.
    pub fn get_challenge_status(
        &self,
        commitment: &Commitment,
        comm_block_number: u64,
    ) -> ChallengeStatus {
        self.get_challenge(commitment, comm_block_number)
            .map_or(ChallengeStatus::Uninitialized, |c| c.status)
    }

    /// True iff no commitment or challenge state is held at all.
    pub fn no_commitments(&self) -> bool {
        self.commitments.is_empty()
            && self.expired_commitments.is_empty()
            && self.challenges.is_empty()
            && self.expired_challenges.is_empty()
    }

    /// Moves every tracked commitment whose window closed at or before
    /// `origin` to the expired queue. A commitment with a matching challenge
    /// expires at the challenge's resolve window end instead of its own
    /// challenge window end. Returns [AltDaError::ReorgRequired] if any moved
    /// commitment had a challenge that was not resolved; all due expirations
    /// are applied before the error is returned.
    pub fn expire_commitments(&mut self, origin: BlockNumHash) -> Result<(), AltDaError> {
        let mut reorg_required = false;
        loop {
            let Some(front) = self.commitments.front() else { break };
            let key = challenge_key(&front.data, front.inclusion_block.number);
            let challenge = self.challenges_index.get(&key);
            let expires_at =
                challenge.map_or(front.challenge_window_end, |c| c.resolve_window_end);
            if expires_at > origin.number {
                break;
            }
            if challenge.is_some_and(|c| c.status != ChallengeStatus::Resolved) {
                reorg_required = true;
            }
            if let Some(commitment) = self.commitments.pop_front() {
                self.expired_commitments.push_back(commitment);
            }
        }
        if reorg_required {
            Err(AltDaError::ReorgRequired)
        } else {
            Ok(())
        }
    }

    /// Moves every challenge whose resolve window closed at or before
    /// `origin` to the expired queue, transitioning records still active to
    /// [ChallengeStatus::Expired]. Returns the number of challenges that
    /// expired unresolved.
    pub fn expire_challenges(&mut self, origin: BlockNumHash) -> usize {
        let mut expired = 0;
        loop {
            let Some(front) = self.challenges.front() else { break };
            if front.resolve_window_end > origin.number {
                break;
            }
            if let Some(entry) = self.challenges.pop_front() {
                if let Some(challenge) = self.challenges_index.get_mut(&entry.key) {
                    // a stale queue entry must not expire a fresher record
                    // bound to the same key
                    if challenge.status == ChallengeStatus::Active
                        && challenge.resolve_window_end <= origin.number
                    {
                        challenge.status = ChallengeStatus::Expired;
                        expired += 1;
                    }
                }
                self.expired_challenges.push_back(entry);
            }
        }
        expired
    }

    /// Removes expired state that is now behind the finalized origin.
    /// Commitments are pruned before challenges: the commitment pass consults
    /// the challenges index for its expiry height, so challenge records must
    /// outlive their matching commitments.
    pub fn prune(&mut self, origin: BlockNumHash) {
        self.prune_commitments(origin);
        self.prune_challenges(origin);
    }

    fn prune_commitments(&mut self, origin: BlockNumHash) {
        loop {
            let Some(front) = self.expired_commitments.front() else { break };
            let key = challenge_key(&front.data, front.inclusion_block.number);
            let expires_at = self
                .challenges_index
                .get(&key)
                .map_or(front.challenge_window_end, |c| c.resolve_window_end);
            if expires_at > origin.number {
                break;
            }
            if let Some(commitment) = self.expired_commitments.pop_front() {
                self.last_pruned_commitment = Some(commitment.inclusion_block);
            }
        }
    }

    fn prune_challenges(&mut self, origin: BlockNumHash) {
        loop {
            let Some(front) = self.expired_challenges.front() else { break };
            if front.resolve_window_end > origin.number {
                break;
            }
            if let Some(entry) = self.expired_challenges.pop_front() {
                // a fresher challenge may have re-bound the key; only drop
                // the index entry whose own window has closed
                if self
                    .challenges_index
                    .get(&entry.key)
                    .is_some_and(|c| c.resolve_window_end <= origin.number)
                {
                    self.challenges_index.remove(&entry.key);
                }
            }
        }
    }

    /// Clears all queues and the index. Used on an external L1 reorg.
    pub fn reset(&mut self) {
        self.commitments.clear();
        self.expired_commitments.clear();
        self.challenges.clear();
        self.expired_challenges.clear();
        self.challenges_index.clear();
    }

    /// Clears only the commitment queues. Used when the pipeline resets
    /// because of an expired challenge: challenge state must survive so that
    /// re-deriving the same commitment observes the expired status without
    /// another reorg.
    pub fn clear_commitments(&mut self) {
        self.commitments.clear();
        self.expired_commitments.clear();
    }
}
