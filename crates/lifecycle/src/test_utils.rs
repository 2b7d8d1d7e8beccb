//! Mock collaborators for manager tests.

use alloc::{boxed::Box, vec::Vec};
use alloy_consensus::{Receipt, Signed, TxEnvelope, TxLegacy};
use alloy_primitives::{map::HashMap, Address, Bytes, Signature, TxKind, B256, U256};
use altda_commitment::Commitment;
use async_trait::async_trait;
use core::fmt;
use kona_protocol::BlockInfo;

use crate::errors::DaStorageError;
use crate::traits::{ChainFetcher, DaStorage};

/// A chain fetcher serving canned blocks, receipts and transactions.
#[derive(Debug, Clone, Default)]
pub struct TestChainFetcher {
    pub blocks: Vec<BlockInfo>,
    pub receipts: HashMap<B256, Vec<Receipt>>,
    pub txs: HashMap<B256, Vec<TxEnvelope>>,
}

impl TestChainFetcher {
    pub fn insert_block(&mut self, block: BlockInfo) {
        self.blocks.push(block);
    }

    pub fn insert_receipts(&mut self, hash: B256, receipts: Vec<Receipt>) {
        self.receipts.insert(hash, receipts);
    }

    pub fn insert_txs(&mut self, hash: B256, txs: Vec<TxEnvelope>) {
        self.txs.insert(hash, txs);
    }
}

/// Error returned by [TestChainFetcher] for data it was not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestFetcherError;

impl fmt::Display for TestFetcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block not found")
    }
}

#[async_trait]
impl ChainFetcher for TestChainFetcher {
    type Error = TestFetcherError;

    async fn block_ref_by_number(&self, number: u64) -> Result<BlockInfo, Self::Error> {
        self.blocks
            .iter()
            .find(|b| b.number == number)
            .copied()
            .ok_or(TestFetcherError)
    }

    async fn receipts_by_hash(&self, hash: B256) -> Result<Vec<Receipt>, Self::Error> {
        Ok(self.receipts.get(&hash).cloned().unwrap_or_default())
    }

    async fn info_and_txs_by_hash(
        &self,
        hash: B256,
    ) -> Result<(BlockInfo, Vec<TxEnvelope>), Self::Error> {
        let info = self
            .blocks
            .iter()
            .find(|b| b.hash == hash)
            .copied()
            .unwrap_or_default();
        Ok((info, self.txs.get(&hash).cloned().unwrap_or_default()))
    }
}

/// A DA storage mock keyed by encoded commitment.
#[derive(Debug, Clone, Default)]
pub struct TestDaStorage {
    pub inputs: HashMap<Bytes, Bytes>,
}

impl TestDaStorage {
    pub fn insert(&mut self, commitment: &Commitment, input: Bytes) {
        self.inputs.insert(commitment.encode(), input);
    }
}

#[async_trait]
impl DaStorage for TestDaStorage {
    async fn get_input(&self, commitment: &Commitment) -> Result<Bytes, DaStorageError> {
        self.inputs
            .get(&commitment.encode())
            .cloned()
            .ok_or(DaStorageError::NotFound)
    }

    async fn set_input(&self, input: &[u8]) -> Result<Commitment, DaStorageError> {
        if input.is_empty() {
            return Err(DaStorageError::InvalidInput);
        }
        Ok(Commitment::keccak256(input))
    }
}

/// A block reference with a hash derived from the number, so receipts and
/// transactions can be keyed per block.
pub fn block(number: u64) -> BlockInfo {
    BlockInfo {
        hash: B256::with_last_byte(number as u8),
        number,
        ..Default::default()
    }
}

/// A legacy transaction envelope wrapping the given calldata.
pub fn calldata_tx(input: Bytes) -> TxEnvelope {
    let tx = TxLegacy {
        chain_id: None,
        nonce: 0,
        gas_price: 0,
        gas_limit: 0,
        to: TxKind::Call(Address::ZERO),
        value: U256::ZERO,
        input,
    };
    let signature = Signature::new(U256::from(1), U256::from(1), false);
    TxEnvelope::Legacy(Signed::new_unchecked(tx, signature, B256::ZERO))
}

/// A successful receipt carrying the given logs.
pub fn receipt(logs: Vec<alloy_primitives::Log>) -> Receipt {
    Receipt { status: true.into(), cumulative_gas_used: 0, logs }
}
