//! Collaborator contracts for the alt-da manager.

use alloc::{boxed::Box, vec::Vec};
use alloy_consensus::{Receipt, TxEnvelope};
use alloy_primitives::{Bytes, B256};
use altda_commitment::Commitment;
use async_trait::async_trait;
use core::fmt::Display;
use kona_protocol::BlockInfo;

use crate::errors::DaStorageError;

/// The narrow view of the parent chain required to sync the DA challenge
/// contract state. Implementations are expected to cache: receipts and
/// transactions for a block are requested repeatedly while derivation stalls
/// on a pending challenge.
#[async_trait]
pub trait ChainFetcher {
    /// Transport error, surfaced verbatim so the driver can retry.
    type Error: Display + Send;

    /// Returns the block reference for the given block number.
    async fn block_ref_by_number(&self, number: u64) -> Result<BlockInfo, Self::Error>;

    /// Returns the receipts of the block with the given hash, in transaction
    /// order.
    async fn receipts_by_hash(&self, hash: B256) -> Result<Vec<Receipt>, Self::Error>;

    /// Returns the block info and transactions of the block with the given
    /// hash, in inclusion order.
    async fn info_and_txs_by_hash(
        &self,
        hash: B256,
    ) -> Result<(BlockInfo, Vec<TxEnvelope>), Self::Error>;
}

/// The contract with the DA storage server.
#[async_trait]
pub trait DaStorage {
    /// Fetches the pre-image for the given commitment.
    async fn get_input(&self, commitment: &Commitment) -> Result<Bytes, DaStorageError>;

    /// Stores the pre-image and returns the commitment under which it is
    /// retrievable.
    async fn set_input(&self, input: &[u8]) -> Result<Commitment, DaStorageError>;
}

/// Callback invoked synchronously inside [finalize][crate::AltDaManager::finalize]
/// with the new alt-da finalized head.
pub type HeadSignalFn = Box<dyn Fn(BlockInfo) + Send + Sync>;
