//! The DA orchestrator driving the state store from parent-chain traversal.
//!
//! The manager is stepped by the derivation pipeline: once per L1 block via
//! [AltDaManager::advance_l1_origin], and per batch-inbox commitment via
//! [AltDaManager::get_input]. It owns the state store and the DA storage
//! client; the L1 fetcher is passed into each call so the manager stays in
//! sync with the confirmation depth of the pipeline.

use alloc::{string::ToString, vec::Vec};
use alloy_consensus::Transaction;
use alloy_eips::BlockNumHash;
use alloy_primitives::{Bytes, Log};
use altda_commitment::{Commitment, CommitmentType};
use kona_genesis::SystemConfig;
use kona_protocol::BlockInfo;
use tracing::{error, info, warn};

use crate::{
    config::AltDaConfig,
    contract::{decode_challenge_event, decode_resolved_input, CHALLENGE_STATUS_EVENT_TOPIC},
    errors::AltDaError,
    metrics::{Metricer, NoopMetrics},
    state::{ChallengeStatus, State},
    traits::{ChainFetcher, DaStorage, HeadSignalFn},
};

/// The alt-da commitment lifecycle manager.
pub struct AltDaManager<S, M = NoopMetrics> {
    cfg: AltDaConfig,
    storage: S,
    metrics: M,
    state: State,

    /// Highest L1 block we synced challenge contract events from.
    challenge_origin: BlockNumHash,
    /// Highest L1 block we expired commitments through.
    commitment_origin: BlockNumHash,
    /// Latest recorded finalized head as per the challenge contract.
    finalized_head: BlockInfo,
    /// Latest recorded finalized head as per the L1 finalization signal.
    l1_finalized_head: BlockInfo,

    /// Set when a reorg we triggered ourselves is in flight, so the next
    /// reset preserves challenge state.
    resetting: bool,

    finalized_head_signal_handler: Option<HeadSignalFn>,
}

impl<S: core::fmt::Debug, M: core::fmt::Debug> core::fmt::Debug for AltDaManager<S, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AltDaManager")
            .field("cfg", &self.cfg)
            .field("storage", &self.storage)
            .field("metrics", &self.metrics)
            .field("state", &self.state)
            .field("challenge_origin", &self.challenge_origin)
            .field("commitment_origin", &self.commitment_origin)
            .field("finalized_head", &self.finalized_head)
            .field("l1_finalized_head", &self.l1_finalized_head)
            .field("resetting", &self.resetting)
            .field(
                "finalized_head_signal_handler",
                &self.finalized_head_signal_handler.is_some(),
            )
            .finish()
    }
}

impl<S: DaStorage> AltDaManager<S> {
    /// Creates a manager with a fresh state store and no metrics.
    pub fn new(cfg: AltDaConfig, storage: S) -> Self {
        Self::with_metrics(cfg, storage, NoopMetrics)
    }
}

impl<S: DaStorage, M: Metricer> AltDaManager<S, M> {
    /// Creates a manager with a fresh state store.
    pub fn with_metrics(cfg: AltDaConfig, storage: S, metrics: M) -> Self {
        let state = State::new(cfg.clone());
        Self::with_state(cfg, storage, metrics, state)
    }

    /// Creates a manager from existing state. Used to test the manager in
    /// isolation.
    pub fn with_state(cfg: AltDaConfig, storage: S, metrics: M, state: State) -> Self {
        Self {
            cfg,
            storage,
            metrics,
            state,
            challenge_origin: BlockNumHash::default(),
            commitment_origin: BlockNumHash::default(),
            finalized_head: BlockInfo::default(),
            l1_finalized_head: BlockInfo::default(),
            resetting: false,
            finalized_head_signal_handler: None,
        }
    }

    /// Registers the callback invoked with the new alt-da finalized head
    /// whenever finalization advances it.
    pub fn on_finalized_head_signal(&mut self, handler: HeadSignalFn) {
        self.finalized_head_signal_handler = Some(handler);
    }

    /// Read access to the state store. Not safe to use concurrently with the
    /// mutating operations.
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Highest L1 block whose challenge events have been applied.
    pub const fn challenge_origin(&self) -> BlockNumHash {
        self.challenge_origin
    }

    /// Highest L1 block whose commitments have been expired through.
    pub const fn commitment_origin(&self) -> BlockNumHash {
        self.commitment_origin
    }

    /// The current alt-da finalized head.
    pub const fn finalized_head(&self) -> BlockInfo {
        self.finalized_head
    }

    /// Whether a self-induced reorg is in flight.
    pub const fn is_resetting(&self) -> bool {
        self.resetting
    }

    /// Returns the input data for the given commitment. `inclusion_block` is
    /// the L1 block in whose batch-inbox calldata the commitment appeared and
    /// keys the challenge lookup.
    pub async fn get_input<F: ChainFetcher>(
        &mut self,
        l1: &F,
        commitment: &Commitment,
        inclusion_block: BlockInfo,
    ) -> Result<Bytes, AltDaError> {
        // Foreign commitment variants are reported as expired so the
        // pipeline skips over them.
        if self.cfg.commitment_type != commitment.commitment_type() {
            return Err(AltDaError::ExpiredChallenge);
        }
        let status = self.state.get_challenge_status(commitment, inclusion_block.number);
        if status == ChallengeStatus::Expired {
            // The data must not be used, and not tracking the commitment
            // avoids a consolidation reorg later.
            return Err(AltDaError::ExpiredChallenge);
        }
        self.state.track_commitment(commitment.clone(), inclusion_block);
        info!(target: "altda", comm = %commitment, ?status, "getting input");

        match self.storage.get_input(commitment).await {
            Ok(data) => Ok(data),
            Err(crate::DaStorageError::NotFound) => {
                warn!(
                    target: "altda",
                    comm = %commitment,
                    ?status,
                    block = inclusion_block.number,
                    "data not found for the given commitment"
                );
                match status {
                    ChallengeStatus::Uninitialized => {
                        if self.challenge_origin.number
                            > inclusion_block.number + self.cfg.challenge_window
                        {
                            // Never challenged and the window closed: the
                            // data is unrecoverable.
                            return Err(AltDaError::MissingPastWindow);
                        }
                        self.look_ahead(l1).await?;
                        Err(AltDaError::PendingChallenge)
                    }
                    ChallengeStatus::Active => {
                        // Keep syncing origins so the challenge can resolve
                        // or expire.
                        self.look_ahead(l1).await?;
                        Err(AltDaError::PendingChallenge)
                    }
                    ChallengeStatus::Resolved => {
                        if commitment.commitment_type() == CommitmentType::Generic {
                            // Generic commitments do not resolve from L1.
                            return Err(AltDaError::MissingPastWindow);
                        }
                        self.state
                            .get_challenge(commitment, inclusion_block.number)
                            .and_then(|c| c.input.clone())
                            .ok_or(AltDaError::UntrackedChallenge)
                    }
                    ChallengeStatus::Expired => Err(AltDaError::ExpiredChallenge),
                }
            }
            Err(err) => {
                error!(target: "altda", %err, "failed to get preimage");
                self.metrics.record_storage_error();
                Err(AltDaError::Storage(err))
            }
        }
    }

    /// Syncs challenge events included in the L1 block, expires challenges
    /// and commitments against it, and derives a new finalized head when the
    /// store holds nothing. Idempotent per sub-step: blocks at or below the
    /// respective cursor are dropped.
    pub async fn advance_l1_origin<F: ChainFetcher>(
        &mut self,
        l1: &F,
        block: BlockNumHash,
    ) -> Result<(), AltDaError> {
        self.advance_challenge_origin(l1, block).await?;
        self.advance_commitment_origin(block)?;
        if self.state.no_commitments() {
            // without commitments to finalize, the finalized head trails the
            // L1 finalized head by the challenge window
            self.update_finalized_from_l1(l1).await?;
            self.metrics.record_challenges_head("finalized", self.finalized_head.number);
        }
        Ok(())
    }

    /// Reads and applies challenge events for the given L1 block, then
    /// expires challenges whose resolve window closed at it.
    pub async fn advance_challenge_origin<F: ChainFetcher>(
        &mut self,
        l1: &F,
        block: BlockNumHash,
    ) -> Result<(), AltDaError> {
        if block.number <= self.challenge_origin.number {
            return Ok(());
        }
        self.load_challenge_events(l1, block).await?;
        let expired = self.state.expire_challenges(block);
        if expired > 0 {
            self.metrics.record_expired_challenges(expired);
        }
        self.challenge_origin = block;
        self.metrics.record_challenges_head("latest", block.number);
        info!(target: "altda", origin = block.number, "processed altda challenge origin");
        Ok(())
    }

    /// Expires tracked commitments against the given L1 block. On
    /// [AltDaError::ReorgRequired] the resetting flag is latched so the
    /// subsequent reset preserves challenge state.
    pub fn advance_commitment_origin(&mut self, block: BlockNumHash) -> Result<(), AltDaError> {
        if block.number <= self.commitment_origin.number {
            return Ok(());
        }
        if let Err(err) = self.state.expire_commitments(block) {
            self.resetting = true;
            return Err(err);
        }
        self.commitment_origin = block;
        info!(
            target: "altda",
            origin = block.number,
            finalized = self.finalized_head.number,
            l1_finalized = self.l1_finalized_head.number,
            "processed altda l1 origin"
        );
        Ok(())
    }

    /// Advances the challenge origin by one block to discover challenges
    /// possibly just posted. Used while derivation stalls on missing data.
    pub async fn look_ahead<F: ChainFetcher>(&mut self, l1: &F) -> Result<(), AltDaError> {
        let block_ref = l1
            .block_ref_by_number(self.challenge_origin.number + 1)
            .await
            .map_err(|err| AltDaError::Fetcher(err.to_string()))?;
        self.advance_challenge_origin(l1, block_ref.id()).await
    }

    /// Applies the L1 finality signal: prunes state behind it, promotes the
    /// last pruned commitment to the alt-da finalized head and notifies the
    /// registered handler.
    pub fn finalize(&mut self, l1_finalized: BlockInfo) {
        self.l1_finalized_head = l1_finalized;
        self.state.prune(l1_finalized.id());
        self.finalized_head = self.state.last_pruned_commitment().unwrap_or_default();
        self.metrics.record_challenges_head("finalized", self.finalized_head.number);

        info!(
            target: "altda",
            l1 = l1_finalized.number,
            altda = self.finalized_head.number,
            "received l1 finalized signal, forwarding altda finalization"
        );

        match &self.finalized_head_signal_handler {
            Some(handler) => handler(self.finalized_head),
            None => warn!(target: "altda", "finalized head signal handler not set"),
        }
    }

    /// Re-bases the manager after a pipeline reset. A reset we triggered
    /// ourselves (expired challenge) clears only commitment state so the
    /// re-derived commitment observes the expired status; an external L1
    /// reorg clears everything. Always returns the
    /// [AltDaError::ResetComplete] sentinel.
    pub fn reset(&mut self, base: BlockInfo, _base_cfg: &SystemConfig) -> Result<(), AltDaError> {
        if self.resetting {
            self.resetting = false;
            self.commitment_origin = base.id();
            self.state.clear_commitments();
        } else {
            self.challenge_origin = base.id();
            self.commitment_origin = base.id();
            self.state.reset();
        }
        Err(AltDaError::ResetComplete)
    }

    async fn update_finalized_from_l1<F: ChainFetcher>(
        &mut self,
        l1: &F,
    ) -> Result<(), AltDaError> {
        if self.l1_finalized_head.number < self.cfg.challenge_window {
            return Ok(());
        }
        let block_ref = l1
            .block_ref_by_number(self.l1_finalized_head.number - self.cfg.challenge_window)
            .await
            .map_err(|err| AltDaError::Fetcher(err.to_string()))?;
        self.finalized_head = block_ref;
        Ok(())
    }

    /// Fetches the block receipts and applies any challenge events addressed
    /// to the configured contract. Events that fail to decode or correlate
    /// are logged and skipped; they never abort the block.
    async fn load_challenge_events<F: ChainFetcher>(
        &mut self,
        l1: &F,
        block: BlockNumHash,
    ) -> Result<(), AltDaError> {
        let logs = self.fetch_challenge_logs(l1, block).await?;

        for (tx_index, log) in logs {
            let decoded = match decode_challenge_event(&log) {
                Ok(decoded) => decoded,
                Err(err) => {
                    error!(
                        target: "altda",
                        block = block.number,
                        tx = tx_index,
                        %err,
                        "failed to decode challenge event"
                    );
                    continue;
                }
            };
            match ChallengeStatus::try_from(decoded.status) {
                Ok(ChallengeStatus::Active) => {
                    info!(
                        target: "altda",
                        block = block.number,
                        comm = %decoded.commitment,
                        "detected new active challenge"
                    );
                    self.metrics.record_active_challenge(
                        decoded.comm_block_number,
                        block.number,
                        &decoded.commitment.encode(),
                    );
                    self.state.create_challenge(
                        decoded.commitment,
                        block,
                        decoded.comm_block_number,
                    );
                }
                Ok(ChallengeStatus::Resolved) => {
                    self.apply_resolved_event(l1, block, tx_index, decoded).await?;
                }
                _ => {
                    warn!(
                        target: "altda",
                        block = block.number,
                        tx = tx_index,
                        status = decoded.status,
                        "skipping unknown challenge status"
                    );
                }
            }
        }
        Ok(())
    }

    /// Correlates a resolved event with its transaction, recovers and
    /// verifies the pre-image, and marks the challenge resolved.
    async fn apply_resolved_event<F: ChainFetcher>(
        &mut self,
        l1: &F,
        block: BlockNumHash,
        tx_index: u64,
        decoded: crate::contract::DecodedChallenge,
    ) -> Result<(), AltDaError> {
        // cached with the receipts call upstream, so not expensive
        let (_, txs) = l1
            .info_and_txs_by_hash(block.hash)
            .await
            .map_err(|err| AltDaError::Fetcher(err.to_string()))?;
        let Some(tx) = txs.get(tx_index as usize) else {
            error!(target: "altda", block = block.number, tx = tx_index, "tx/receipt mismatch");
            return Ok(());
        };

        let input = if self.cfg.commitment_type == CommitmentType::Keccak256 {
            let input = match decode_resolved_input(tx.input()) {
                Ok(input) => input,
                Err(err) => {
                    error!(
                        target: "altda",
                        block = block.number,
                        tx = tx_index,
                        %err,
                        "failed to decode resolved input"
                    );
                    return Ok(());
                }
            };
            if let Err(err) = decoded.commitment.verify(&input) {
                error!(
                    target: "altda",
                    block = block.number,
                    tx = tx_index,
                    %err,
                    "failed to verify commitment"
                );
                return Ok(());
            }
            Some(input)
        } else {
            None
        };

        info!(target: "altda", block = block.number, tx = tx_index, "challenge resolved");
        self.metrics.record_resolved_challenge(&decoded.commitment.encode());
        if let Err(err) = self.state.resolve_challenge(
            &decoded.commitment,
            decoded.comm_block_number,
            input,
        ) {
            error!(
                target: "altda",
                block = block.number,
                tx = tx_index,
                %err,
                "failed to resolve challenge"
            );
        }
        Ok(())
    }

    /// Returns challenge-contract logs for the block, tagged with the index
    /// of the emitting transaction. Receipts arrive in transaction order, so
    /// the position of a receipt is the index of its transaction.
    async fn fetch_challenge_logs<F: ChainFetcher>(
        &self,
        l1: &F,
        block: BlockNumHash,
    ) -> Result<Vec<(u64, Log)>, AltDaError> {
        // generic commitments have no challenge contract to watch
        if self.cfg.commitment_type == CommitmentType::Generic {
            return Ok(Vec::new());
        }
        let receipts = l1
            .receipts_by_hash(block.hash)
            .await
            .map_err(|err| AltDaError::Fetcher(err.to_string()))?;
        info!(
            target: "altda",
            epoch = block.number,
            num_receipts = receipts.len(),
            "loading challenges"
        );
        let mut logs = Vec::new();
        for (tx_index, receipt) in receipts.iter().enumerate() {
            if !receipt.status.coerce_status() {
                continue;
            }
            for log in &receipt.logs {
                if log.address == self.cfg.da_challenge_contract
                    && log.data.topics().first() == Some(&CHALLENGE_STATUS_EVENT_TOPIC)
                {
                    logs.push((tx_index as u64, log.clone()));
                }
            }
        }
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{resolveCall, ChallengeStatusChanged};
    use crate::test_utils::{block, calldata_tx, receipt, TestChainFetcher, TestDaStorage};
    use alloc::{sync::Arc, vec};
    use alloy_primitives::{address, Address, U256};
    use alloy_sol_types::{SolCall, SolEvent};
    use core::sync::atomic::{AtomicU64, Ordering};

    const CONTRACT: Address = address!("00000000000000000000000000000000000000da");

    fn config(commitment_type: CommitmentType) -> AltDaConfig {
        AltDaConfig {
            da_challenge_contract: CONTRACT,
            commitment_type,
            challenge_window: 6,
            resolve_window: 6,
        }
    }

    fn manager(
        commitment_type: CommitmentType,
        storage: TestDaStorage,
    ) -> AltDaManager<TestDaStorage> {
        AltDaManager::new(config(commitment_type), storage)
    }

    fn challenge_log(comm: &Commitment, comm_block: u64, status: u8) -> Log {
        let event = ChallengeStatusChanged {
            challengedBlockNumber: U256::from(comm_block),
            challengedCommitment: comm.encode(),
            status,
        };
        Log { address: CONTRACT, data: event.encode_log_data() }
    }

    fn resolve_calldata(comm: &Commitment, comm_block: u64, input: &[u8]) -> Bytes {
        resolveCall {
            challengedBlockNumber: U256::from(comm_block),
            challengedCommitment: comm.encode(),
            resolveData: Bytes::copy_from_slice(input),
        }
        .abi_encode()
        .into()
    }

    #[tokio::test]
    async fn test_get_input_returns_data() {
        let comm = Commitment::keccak256(b"payload");
        let mut storage = TestDaStorage::default();
        storage.insert(&comm, Bytes::from_static(b"payload"));
        let mut da = manager(CommitmentType::Keccak256, storage);
        let l1 = TestChainFetcher::default();

        let data = da.get_input(&l1, &comm, block(5)).await.unwrap();
        assert_eq!(data, Bytes::from_static(b"payload"));
        // the commitment is tracked for later finalization
        assert!(!da.state().no_commitments());
    }

    #[tokio::test]
    async fn test_get_input_foreign_variant_is_skipped() {
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        let l1 = TestChainFetcher::default();

        let foreign = Commitment::generic(vec![0x01, 0x02]);
        let result = da.get_input(&l1, &foreign, block(5)).await;
        assert_eq!(result, Err(AltDaError::ExpiredChallenge));
        assert!(da.state().no_commitments());
    }

    #[tokio::test]
    async fn test_get_input_expired_challenge_not_tracked() {
        let comm = Commitment::keccak256(b"gone");
        let cfg = config(CommitmentType::Keccak256);
        let mut state = State::new(cfg.clone());
        state.create_challenge(comm.clone(), BlockNumHash { hash: Default::default(), number: 3 }, 1);
        state.expire_challenges(BlockNumHash { hash: Default::default(), number: 9 });
        let mut da = AltDaManager::with_state(cfg, TestDaStorage::default(), NoopMetrics, state);
        let l1 = TestChainFetcher::default();

        let result = da.get_input(&l1, &comm, block(1)).await;
        assert_eq!(result, Err(AltDaError::ExpiredChallenge));
        // expired data is skipped without tracking, avoiding a later reorg:
        // once the stale challenge is pruned nothing remains in the store
        da.finalize(block(20));
        assert!(da.state().no_commitments());
        assert_eq!(da.finalized_head().number, 0);
    }

    #[tokio::test]
    async fn test_get_input_missing_data_looks_ahead() {
        let comm = Commitment::keccak256(b"missing");
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        let mut l1 = TestChainFetcher::default();
        for number in 1..=4 {
            l1.insert_block(block(number));
        }

        da.advance_challenge_origin(&l1, block(3).id()).await.unwrap();
        let result = da.get_input(&l1, &comm, block(1)).await;
        assert_eq!(result, Err(AltDaError::PendingChallenge));
        // the look-ahead advanced the challenge origin by one block
        assert_eq!(da.challenge_origin().number, 4);
    }

    #[tokio::test]
    async fn test_get_input_missing_past_window() {
        let comm = Commitment::keccak256(b"missing");
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        let mut l1 = TestChainFetcher::default();
        l1.insert_block(block(8));

        da.advance_challenge_origin(&l1, block(8).id()).await.unwrap();
        let result = da.get_input(&l1, &comm, block(1)).await;
        assert_eq!(result, Err(AltDaError::MissingPastWindow));
    }

    #[tokio::test]
    async fn test_get_input_resolved_keccak_reads_challenge_input() {
        let comm = Commitment::keccak256(b"resolved input");
        let cfg = config(CommitmentType::Keccak256);
        let mut state = State::new(cfg.clone());
        state.create_challenge(comm.clone(), BlockNumHash { hash: Default::default(), number: 8 }, 5);
        state
            .resolve_challenge(&comm, 5, Some(Bytes::from_static(b"resolved input")))
            .unwrap();
        let mut da = AltDaManager::with_state(cfg, TestDaStorage::default(), NoopMetrics, state);
        let l1 = TestChainFetcher::default();

        let data = da.get_input(&l1, &comm, block(5)).await.unwrap();
        assert_eq!(data, Bytes::from_static(b"resolved input"));
    }

    #[tokio::test]
    async fn test_get_input_resolved_generic_is_missing() {
        let comm = Commitment::generic(vec![0xaa; 16]);
        let cfg = config(CommitmentType::Generic);
        let mut state = State::new(cfg.clone());
        state.create_challenge(comm.clone(), BlockNumHash { hash: Default::default(), number: 8 }, 5);
        state.resolve_challenge(&comm, 5, None).unwrap();
        let mut da = AltDaManager::with_state(cfg, TestDaStorage::default(), NoopMetrics, state);
        let l1 = TestChainFetcher::default();

        let result = da.get_input(&l1, &comm, block(5)).await;
        assert_eq!(result, Err(AltDaError::MissingPastWindow));
    }

    #[tokio::test]
    async fn test_advance_applies_active_challenge_event() {
        let comm = Commitment::keccak256(b"challenged");
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        let mut l1 = TestChainFetcher::default();
        let b10 = block(10);
        l1.insert_block(b10);
        l1.insert_receipts(b10.hash, vec![receipt(vec![challenge_log(&comm, 5, 1)])]);

        da.advance_l1_origin(&l1, b10.id()).await.unwrap();
        assert_eq!(da.state().get_challenge_status(&comm, 5), ChallengeStatus::Active);
        assert_eq!(da.challenge_origin().number, 10);
    }

    #[tokio::test]
    async fn test_advance_applies_resolved_challenge_event() {
        let input = b"the actual preimage";
        let comm = Commitment::keccak256(input);
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        let mut l1 = TestChainFetcher::default();

        let b10 = block(10);
        l1.insert_block(b10);
        l1.insert_receipts(b10.hash, vec![receipt(vec![challenge_log(&comm, 5, 1)])]);
        da.advance_l1_origin(&l1, b10.id()).await.unwrap();

        let b11 = block(11);
        l1.insert_block(b11);
        l1.insert_receipts(b11.hash, vec![receipt(vec![challenge_log(&comm, 5, 2)])]);
        l1.insert_txs(b11.hash, vec![calldata_tx(resolve_calldata(&comm, 5, input))]);
        da.advance_l1_origin(&l1, b11.id()).await.unwrap();

        let challenge = da.state().get_challenge(&comm, 5).unwrap();
        assert_eq!(challenge.status, ChallengeStatus::Resolved);
        assert_eq!(challenge.input, Some(Bytes::copy_from_slice(input)));
    }

    #[tokio::test]
    async fn test_advance_skips_mismatched_preimage() {
        let comm = Commitment::keccak256(b"expected");
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        let mut l1 = TestChainFetcher::default();

        let b10 = block(10);
        l1.insert_block(b10);
        l1.insert_receipts(b10.hash, vec![receipt(vec![challenge_log(&comm, 5, 1)])]);
        da.advance_l1_origin(&l1, b10.id()).await.unwrap();

        let b11 = block(11);
        l1.insert_block(b11);
        l1.insert_receipts(b11.hash, vec![receipt(vec![challenge_log(&comm, 5, 2)])]);
        l1.insert_txs(b11.hash, vec![calldata_tx(resolve_calldata(&comm, 5, b"wrong"))]);
        da.advance_l1_origin(&l1, b11.id()).await.unwrap();

        // the bogus resolve is dropped; the challenge stays active
        assert_eq!(da.state().get_challenge_status(&comm, 5), ChallengeStatus::Active);
    }

    #[tokio::test]
    async fn test_advance_skips_unknown_status_and_malformed_events() {
        let comm = Commitment::keccak256(b"odd");
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        let mut l1 = TestChainFetcher::default();

        let bogus = Log {
            address: CONTRACT,
            data: alloy_primitives::LogData::new_unchecked(
                vec![CHALLENGE_STATUS_EVENT_TOPIC],
                Bytes::from_static(&[0xde, 0xad]),
            ),
        };
        let b10 = block(10);
        l1.insert_block(b10);
        l1.insert_receipts(
            b10.hash,
            vec![receipt(vec![bogus, challenge_log(&comm, 5, 7)])],
        );

        da.advance_l1_origin(&l1, b10.id()).await.unwrap();
        assert_eq!(da.state().get_challenge_status(&comm, 5), ChallengeStatus::Uninitialized);
        assert_eq!(da.challenge_origin().number, 10);
    }

    #[tokio::test]
    async fn test_advance_is_idempotent_per_cursor() {
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        // the fetcher holds nothing: a repeated or stale block must not
        // trigger any fetch
        let l1 = TestChainFetcher::default();
        da.advance_l1_origin(&l1, BlockNumHash::default()).await.unwrap();
        assert_eq!(da.challenge_origin().number, 0);
    }

    #[tokio::test]
    async fn test_expired_challenge_reorg_and_reset_handshake() {
        let comm = Commitment::keccak256(b"reorged");
        let cfg = config(CommitmentType::Keccak256);
        let mut state = State::new(cfg.clone());
        state.track_commitment(comm.clone(), block(1));
        state.create_challenge(comm.clone(), BlockNumHash { hash: Default::default(), number: 3 }, 1);
        let mut da = AltDaManager::with_state(cfg, TestDaStorage::default(), NoopMetrics, state);
        let l1 = TestChainFetcher::default();

        // resolve window of the challenge ends at block 9
        let result = da.advance_l1_origin(&l1, block(9).id()).await;
        assert_eq!(result, Err(AltDaError::ReorgRequired));
        assert!(da.is_resetting());

        // the self-induced reset keeps challenge state
        let result = da.reset(block(1), &SystemConfig::default());
        assert_eq!(result, Err(AltDaError::ResetComplete));
        assert!(!da.is_resetting());
        assert_eq!(da.state().get_challenge_status(&comm, 1), ChallengeStatus::Expired);

        // re-deriving the same commitment now skips it without a new reorg
        let result = da.get_input(&l1, &comm, block(1)).await;
        assert_eq!(result, Err(AltDaError::ExpiredChallenge));

        // a further, externally caused reset clears everything
        let result = da.reset(block(0), &SystemConfig::default());
        assert_eq!(result, Err(AltDaError::ResetComplete));
        assert_eq!(
            da.state().get_challenge_status(&comm, 1),
            ChallengeStatus::Uninitialized
        );
    }

    #[tokio::test]
    async fn test_finalize_prunes_and_signals() {
        let comm = Commitment::keccak256(b"final");
        let cfg = config(CommitmentType::Keccak256);
        let mut state = State::new(cfg.clone());
        state.track_commitment(comm.clone(), block(2));
        let _ = state.expire_commitments(BlockNumHash { hash: Default::default(), number: 8 });
        let mut da = AltDaManager::with_state(cfg, TestDaStorage::default(), NoopMetrics, state);

        let signalled = Arc::new(AtomicU64::new(u64::MAX));
        let observer = Arc::clone(&signalled);
        da.on_finalized_head_signal(alloc::boxed::Box::new(move |head| {
            observer.store(head.number, Ordering::SeqCst);
        }));

        da.finalize(block(8));
        assert_eq!(da.finalized_head().number, 2);
        assert_eq!(signalled.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_finalized_head_from_l1_when_no_commitments() {
        let mut da = manager(CommitmentType::Keccak256, TestDaStorage::default());
        let mut l1 = TestChainFetcher::default();
        l1.insert_block(block(14));
        l1.insert_block(block(21));

        da.finalize(block(20));
        da.advance_l1_origin(&l1, block(21).id()).await.unwrap();
        // finalized head trails the l1 finalized head by the challenge window
        assert_eq!(da.finalized_head().number, 14);
    }
}
