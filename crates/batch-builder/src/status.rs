use crate::{ActiveBatch, ActiveBatchInfo};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// The current status of the batch builder.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BatchBuilderStatus {
    /// Whether the builder is replaying blocks from the block source.
    pub syncing: bool,
    /// The last processed block number.
    pub last_processed_block_number: u64,
    /// A snapshot of the active batch.
    pub active_batch: ActiveBatchInfo,
}

/// The state shared between the builder and its handles.
///
/// The builder task is the only writer. The lock around the active batch exists for readers
/// introspecting the builder from other tasks.
#[derive(Debug)]
pub(crate) struct SharedState {
    pub(crate) active_batch: RwLock<ActiveBatch>,
    last_processed_block_number: AtomicU64,
    syncing: AtomicBool,
}

impl SharedState {
    pub(crate) fn new(active_batch: ActiveBatch, last_processed_block_number: u64) -> Self {
        Self {
            active_batch: RwLock::new(active_batch),
            last_processed_block_number: AtomicU64::new(last_processed_block_number),
            syncing: AtomicBool::new(false),
        }
    }

    pub(crate) fn last_processed_block_number(&self) -> u64 {
        self.last_processed_block_number.load(Ordering::Acquire)
    }

    pub(crate) fn set_last_processed_block_number(&self, block_number: u64) {
        self.last_processed_block_number.store(block_number, Ordering::Release);
    }

    pub(crate) fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub(crate) fn set_syncing(&self, syncing: bool) {
        self.syncing.store(syncing, Ordering::Release);
    }

    pub(crate) fn status(&self) -> BatchBuilderStatus {
        BatchBuilderStatus {
            syncing: self.is_syncing(),
            last_processed_block_number: self.last_processed_block_number(),
            active_batch: self.active_batch.read().info(),
        }
    }
}
