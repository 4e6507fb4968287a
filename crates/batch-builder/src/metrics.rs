use metrics::{Counter, Gauge, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::BatchBuilder`].
#[derive(Metrics, Clone)]
#[metrics(scope = "batch_builder")]
pub(crate) struct BatchBuilderMetrics {
    /// The number of blocks folded into a batch.
    pub(crate) blocks_processed: Counter,
    /// The number of empty blocks processed.
    pub(crate) empty_blocks: Counter,
    /// The number of stale blocks ignored.
    pub(crate) stale_blocks: Counter,
    /// The number of future blocks dropped.
    pub(crate) future_blocks_dropped: Counter,
    /// The number of batches submitted.
    pub(crate) batches_submitted: Counter,
    /// The last processed block number.
    pub(crate) last_processed_block_number: Gauge,
    /// The number of transitions per submitted batch.
    pub(crate) batch_transitions: Histogram,
    /// The estimated gas per submitted batch.
    pub(crate) batch_gas_used: Histogram,
    /// The duration of the submit and persist sequence.
    pub(crate) submission_duration: Histogram,
}

/// The metrics for the [`super::BatchBuilderHandle`].
#[derive(Metrics, Clone)]
#[metrics(scope = "batch_builder")]
pub(crate) struct BatchBuilderHandleMetrics {
    /// Failed to send command to the batch builder from handle counter.
    pub(crate) handle_send_command_failed: Counter,
}
