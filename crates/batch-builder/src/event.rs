use rollup_batch_primitives::BatchInfo;

/// Events emitted by the batch builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchBuilderEvent {
    /// The startup replay from the block source has completed.
    SyncCompleted {
        /// The last processed block number after the replay.
        last_processed_block_number: u64,
    },
    /// A batch has been submitted and the last processed marker persisted.
    BatchSubmitted(BatchInfo),
    /// An empty block has been processed.
    EmptyBlockProcessed(u64),
    /// A block ahead of the next expected block was received and dropped.
    FutureBlockDropped {
        /// The number of the dropped block.
        number: u64,
        /// The number of the next expected block.
        expected: u64,
    },
}
