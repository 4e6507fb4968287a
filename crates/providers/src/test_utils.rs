//! Test utils for providers.

use crate::{BatchSubmitter, BlockSource, ProviderError};
use alloy_primitives::{keccak256, Bytes};
use parking_lot::{Mutex, RwLock};
use rollup_batch_primitives::{
    Block, Transaction, TransitionBatch, CALLDATA_NON_ZERO_BYTE_GAS, TRANSITION_SLOT_GAS,
};
use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// Returns a block at the provided number without transactions.
pub fn empty_block(number: u64) -> Block {
    Block::new(number, keccak256(number.to_be_bytes()), vec![])
}

/// Returns a block at the provided number with a single transaction whose estimated gas cost is
/// exactly `gas`.
///
/// # Panics
///
/// Panics if `gas` cannot be expressed as the slot cost plus a whole number of non-zero bytes.
pub fn block_with_gas_cost(number: u64, gas: u64) -> Block {
    assert!(gas >= TRANSITION_SLOT_GAS, "gas below the transition slot cost");
    let calldata = gas - TRANSITION_SLOT_GAS;
    assert_eq!(calldata % CALLDATA_NON_ZERO_BYTE_GAS, 0, "gas not reachable with non-zero bytes");
    let input = Bytes::from(vec![0xffu8; (calldata / CALLDATA_NON_ZERO_BYTE_GAS) as usize]);
    Block::new(number, keccak256(number.to_be_bytes()), vec![Transaction::new(input)])
}

/// A [`BlockSource`] that serves blocks from memory. Blocks can be added while the source is in
/// use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlockSource {
    blocks: Arc<RwLock<BTreeMap<u64, Block>>>,
}

impl InMemoryBlockSource {
    /// Returns a new [`InMemoryBlockSource`] serving the provided blocks.
    pub fn new(blocks: impl IntoIterator<Item = Block>) -> Self {
        let source = Self::default();
        source.extend(blocks);
        source
    }

    /// Adds a block to the source.
    pub fn push(&self, block: Block) {
        self.blocks.write().insert(block.number, block);
    }

    /// Adds the blocks to the source.
    pub fn extend(&self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.write().extend(blocks.into_iter().map(|block| (block.number, block)));
    }

    /// Returns the highest block number served by the source.
    pub fn head(&self) -> Option<u64> {
        self.blocks.read().keys().next_back().copied()
    }
}

#[async_trait::async_trait]
impl BlockSource for InMemoryBlockSource {
    async fn block_by_number(&self, number: u64) -> Result<Option<Block>, ProviderError> {
        Ok(self.blocks.read().get(&number).cloned())
    }
}

/// A [`BatchSubmitter`] that records every submitted batch. It can be switched into a failing
/// mode in which every submission returns an error.
#[derive(Debug, Clone, Default)]
pub struct RecordingSubmitter {
    batches: Arc<Mutex<Vec<TransitionBatch>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingSubmitter {
    /// Returns the batches submitted so far.
    pub fn batches(&self) -> Vec<TransitionBatch> {
        self.batches.lock().clone()
    }

    /// Returns the block numbers of the transitions of each submitted batch.
    pub fn batch_block_numbers(&self) -> Vec<Vec<u64>> {
        self.batches.lock().iter().map(|batch| batch.block_numbers().collect()).collect()
    }

    /// Makes every following submission fail if `fail` is true.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl BatchSubmitter for RecordingSubmitter {
    async fn submit(&self, batch: TransitionBatch) -> Result<(), ProviderError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Submission("submitter configured to fail".to_string()));
        }
        self.batches.lock().push(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_with_gas_cost() {
        let block = block_with_gas_cost(4, 100_000);
        assert_eq!(block.rollup_gas_cost(), 100_000);
        assert_eq!(block.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_block_source() -> eyre::Result<()> {
        let source = InMemoryBlockSource::new((1..=3).map(empty_block));
        assert_eq!(source.block_by_number(2).await?.map(|b| b.number), Some(2));
        assert!(source.block_by_number(4).await?.is_none());

        source.push(empty_block(4));
        assert_eq!(source.head(), Some(4));
        assert!(source.block_by_number(4).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_recording_submitter_failure_mode() {
        let submitter = RecordingSubmitter::default();
        let batch = TransitionBatch {
            first_block_number: 1,
            last_block_number: 1,
            gas_used: 0,
            transitions: block_with_gas_cost(1, TRANSITION_SLOT_GAS).transitions().collect(),
        };

        submitter.submit(batch.clone()).await.unwrap();
        submitter.set_failing(true);
        assert!(matches!(
            submitter.submit(batch).await,
            Err(ProviderError::Submission(_))
        ));
        assert_eq!(submitter.batch_block_numbers(), vec![vec![1]]);
    }
}
