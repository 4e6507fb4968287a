//! This library contains the transition batch builder, which folds a stream of execution layer
//! blocks into size, gas and time bounded batches and hands completed batches to a
//! [`BatchSubmitter`].
//!
//! The builder runs as a single task that owns the [`ActiveBatch`] and the last processed block
//! number. Producers talk to it exclusively through a bounded intake queue exposed by the
//! [`BatchBuilderHandle`]. On startup the builder loads the last processed marker from its
//! [`KeyValueStore`] and replays every following block from the [`BlockSource`], so a batch that
//! was accumulated but never submitted before a restart is rebuilt deterministically.

use std::{sync::Arc, time::Instant};

use rollup_batch_db::{
    read_last_processed_block_number, write_last_processed_block_number, KeyValueStore,
};
use rollup_batch_primitives::Block;
use rollup_batch_providers::{BatchSubmitter, BlockSource};
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::{interval_at, Interval, MissedTickBehavior},
};
use tracing::{debug, error, info, trace, warn};

mod batch;
pub use batch::{ActiveBatch, ActiveBatchInfo, AddTransitionError};

mod config;
pub use config::{
    BatchBuilderArgs, BatchBuilderConfig, DEFAULT_INTAKE_CAPACITY, DEFAULT_MAX_BATCH_GAS,
    DEFAULT_MAX_BATCH_TIME_MS, DEFAULT_MAX_BATCH_TRANSACTIONS, TRANSITION_BATCH_GAS_BUFFER,
};

mod error;
pub use error::BatchBuilderError;

mod event;
pub use event::BatchBuilderEvent;

mod handle;
pub use handle::{BatchBuilderCommand, BatchBuilderHandle};

mod metrics;
use metrics::BatchBuilderMetrics;

mod status;
pub use status::BatchBuilderStatus;
use status::SharedState;

/// The size of the event channel.
const EVENT_CHANNEL_SIZE: usize = 1_000;

/// The log target of the batch builder.
const TARGET: &str = "rollup::batch_builder";

/// The batch builder is responsible for accumulating blocks into transition batches and
/// submitting them.
pub struct BatchBuilder<BS, S, KV> {
    /// The builder configuration.
    config: BatchBuilderConfig,
    /// The source used to replay blocks on startup.
    block_source: BS,
    /// The submitter finalized batches are handed to.
    submitter: S,
    /// The store holding the last processed marker.
    store: KV,
    /// The last processed block number.
    last_processed_block_number: u64,
    /// The last processed block number observed at the previous timer tick.
    last_tick_block_number: u64,
    /// The state shared with the handles.
    shared: Arc<SharedState>,
    /// The intake queue.
    commands: mpsc::Receiver<BatchBuilderCommand>,
    /// The event sender.
    events: broadcast::Sender<BatchBuilderEvent>,
    /// The builder metrics.
    metrics: BatchBuilderMetrics,
}

impl<BS, S, KV> BatchBuilder<BS, S, KV>
where
    BS: BlockSource + 'static,
    S: BatchSubmitter + 'static,
    KV: KeyValueStore + 'static,
{
    /// Creates a new [`BatchBuilder`] and its [`BatchBuilderHandle`].
    ///
    /// The last processed block number is loaded from the store, an absent marker defaults to 0.
    pub async fn new(
        config: BatchBuilderConfig,
        block_source: BS,
        submitter: S,
        store: KV,
    ) -> Result<(Self, BatchBuilderHandle), BatchBuilderError> {
        config.validate()?;

        let last_processed_block_number = read_last_processed_block_number(&store).await?;
        if last_processed_block_number == u64::MAX {
            return Err(BatchBuilderError::InvalidMarker(last_processed_block_number))
        }
        info!(target: TARGET, last_processed_block_number, "Loaded last processed block number");

        let (command_tx, command_rx) = mpsc::channel(config.intake_capacity());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let shared = Arc::new(SharedState::new(
            ActiveBatch::new(config.gas_buffer()),
            last_processed_block_number,
        ));

        let metrics = BatchBuilderMetrics::default();
        metrics.last_processed_block_number.set(last_processed_block_number as f64);

        let builder = Self {
            config,
            block_source,
            submitter,
            store,
            last_processed_block_number,
            last_tick_block_number: last_processed_block_number,
            shared: shared.clone(),
            commands: command_rx,
            events: event_tx.clone(),
            metrics,
        };
        let handle = BatchBuilderHandle::new(command_tx, event_tx, shared);

        Ok((builder, handle))
    }

    /// Creates a new [`BatchBuilder`] and spawns it onto the tokio runtime.
    ///
    /// The returned [`JoinHandle`] resolves once the builder stops, with the fatal error if one
    /// occurred.
    pub async fn spawn(
        config: BatchBuilderConfig,
        block_source: BS,
        submitter: S,
        store: KV,
    ) -> Result<(BatchBuilderHandle, JoinHandle<Result<(), BatchBuilderError>>), BatchBuilderError>
    {
        let (builder, handle) = Self::new(config, block_source, submitter, store).await?;
        Ok((handle, tokio::spawn(builder.run())))
    }

    /// Returns the last processed block number.
    pub const fn last_processed_block_number(&self) -> u64 {
        self.last_processed_block_number
    }

    /// Execution loop for the batch builder.
    ///
    /// Replays the blocks following the last processed block from the block source, then
    /// consumes the intake queue until it is closed. Every error is fatal and stops the loop.
    pub async fn run(mut self) -> Result<(), BatchBuilderError> {
        let res = self.run_inner().await;
        if let Err(err) = &res {
            error!(target: TARGET, ?err, "Batch builder stopped on a fatal error");
        }
        res
    }

    async fn run_inner(&mut self) -> Result<(), BatchBuilderError> {
        self.sync().await?;

        let mut timer = batch_timer(&self.config);
        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    match command {
                        Some(BatchBuilderCommand::NewBlock(block)) => {
                            self.handle_block(block).await?;
                        }
                        Some(BatchBuilderCommand::Status(tx)) => {
                            let _ = tx.send(self.shared.status());
                        }
                        Some(BatchBuilderCommand::Shutdown) => {
                            info!(target: TARGET, "Shutdown requested - closing the intake queue.");
                            self.commands.close();
                            break;
                        }
                        None => {
                            info!(target: TARGET, "Intake queue has been closed - shutting down.");
                            break;
                        }
                    }
                }
                _ = timer.tick() => {
                    self.handle_timer_tick().await?;
                }
            }
        }

        let active = self.shared.active_batch.read().info();
        if active.transitions > 0 {
            warn!(
                target: TARGET,
                first_block_number = ?active.first_block_number,
                last_block_number = ?active.last_block_number,
                transitions = active.transitions,
                "Stopped with an open batch, its blocks will be replayed on restart"
            );
        }

        Ok(())
    }

    /// Replays every block following the last processed block from the block source until the
    /// source returns no block.
    async fn sync(&mut self) -> Result<(), BatchBuilderError> {
        self.shared.set_syncing(true);
        info!(target: TARGET, last_processed_block_number = self.last_processed_block_number, "Syncing from block source");

        loop {
            let Some(requested) = self.last_processed_block_number.checked_add(1) else { break };
            let Some(block) = self.block_source.block_by_number(requested).await? else { break };
            if block.number != requested {
                return Err(BatchBuilderError::UnexpectedBlockNumber {
                    requested,
                    got: block.number,
                })
            }
            self.handle_block(block).await?;
        }

        self.shared.set_syncing(false);
        info!(target: TARGET, last_processed_block_number = self.last_processed_block_number, "Sync completed");
        let _ = self.events.send(BatchBuilderEvent::SyncCompleted {
            last_processed_block_number: self.last_processed_block_number,
        });

        Ok(())
    }

    /// Folds the block into the active batch. Returns true if a batch was submitted.
    pub async fn handle_block(&mut self, block: Block) -> Result<bool, BatchBuilderError> {
        let last = self.last_processed_block_number;
        trace!(target: TARGET, block_number = block.number, last_processed_block_number = last, "Handling block");

        if block.number <= last {
            debug!(target: TARGET, block_number = block.number, "Ignoring stale block");
            self.metrics.stale_blocks.increment(1);
            return Ok(false)
        }

        // `last` is below `block.number`, so the increment cannot overflow.
        let expected = last + 1;
        if block.number > expected {
            error!(target: TARGET, block_number = block.number, expected, "Dropping block received ahead of the next expected block");
            self.metrics.future_blocks_dropped.increment(1);
            let _ = self
                .events
                .send(BatchBuilderEvent::FutureBlockDropped { number: block.number, expected });
            return Ok(false)
        }

        match block.transaction_count() {
            0 => {
                debug!(target: TARGET, block_number = block.number, "Processing empty block");
                self.shared.active_batch.write().add_empty_block(block.number);
                self.set_last_processed_block_number(block.number);
                self.metrics.empty_blocks.increment(1);
                let _ = self.events.send(BatchBuilderEvent::EmptyBlockProcessed(block.number));
                return Ok(false)
            }
            1 => {}
            count => {
                return Err(BatchBuilderError::TooManyTransactions { block: block.number, count })
            }
        }

        let max_gas = self.config.max_batch_gas();
        let max_transactions = self.config.max_batch_transactions();

        let mut built = false;
        let res = self.shared.active_batch.write().try_add(&block, max_gas, max_transactions);
        if let Err(reason) = res {
            debug!(target: TARGET, block_number = block.number, %reason, "Batch limit reached, finalizing the active batch");
            built = self.finalize(true).await?;

            let res = self.shared.active_batch.write().try_add(&block, max_gas, max_transactions);
            res.map_err(|_| BatchBuilderError::BlockExceedsBatchLimits {
                block: block.number,
                gas: block.rollup_gas_cost(),
            })?;
        }

        self.set_last_processed_block_number(block.number);
        self.metrics.blocks_processed.increment(1);

        // submit right away if the batch cannot take another transition.
        built |= self.finalize(false).await?;

        Ok(built)
    }

    /// Finalizes the active batch: swaps it for a fresh one, submits it and persists its last
    /// block number. Returns true if a batch was submitted.
    ///
    /// Unless `force` is set, the batch is only finalized if it is full. An empty batch is never
    /// submitted.
    pub async fn finalize(&mut self, force: bool) -> Result<bool, BatchBuilderError> {
        let sealed = {
            let mut active = self.shared.active_batch.write();
            let full =
                active.is_full(self.config.max_batch_gas(), self.config.max_batch_transactions());
            if active.is_empty() || !(force || full) {
                return Ok(false)
            }
            std::mem::replace(&mut *active, ActiveBatch::new(self.config.gas_buffer())).seal()
        };
        let Some(batch) = sealed else { return Ok(false) };

        let info = batch.info();
        info!(
            target: TARGET,
            first_block_number = info.first_block_number,
            last_block_number = info.last_block_number,
            transitions = info.transitions,
            gas_used = info.gas_used,
            hash = %info.hash,
            force,
            "Submitting transition batch"
        );

        let now = Instant::now();
        self.submitter.submit(batch).await?;
        write_last_processed_block_number(&self.store, info.last_block_number).await?;
        self.metrics.submission_duration.record(now.elapsed().as_secs_f64());

        self.metrics.batches_submitted.increment(1);
        self.metrics.batch_transitions.record(info.transitions as f64);
        self.metrics.batch_gas_used.record(info.gas_used as f64);
        let _ = self.events.send(BatchBuilderEvent::BatchSubmitted(info));

        Ok(true)
    }

    /// Forces the submission of the active batch if blocks were processed since the previous
    /// tick.
    async fn handle_timer_tick(&mut self) -> Result<(), BatchBuilderError> {
        if self.last_tick_block_number == self.last_processed_block_number {
            trace!(target: TARGET, "No progress since the previous batch timer tick");
            return Ok(())
        }
        self.last_tick_block_number = self.last_processed_block_number;

        if self.finalize(true).await? {
            debug!(target: TARGET, "Batch timer forced the submission of the active batch");
        }
        Ok(())
    }

    fn set_last_processed_block_number(&mut self, block_number: u64) {
        self.last_processed_block_number = block_number;
        self.shared.set_last_processed_block_number(block_number);
        self.metrics.last_processed_block_number.set(block_number as f64);
    }
}

/// Returns the batch timer. The first tick fires one period after creation.
fn batch_timer(config: &BatchBuilderConfig) -> Interval {
    let period = config.max_batch_time();
    let mut interval = interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

impl<BS, S, KV> std::fmt::Debug for BatchBuilder<BS, S, KV> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchBuilder")
            .field("config", &self.config)
            .field("block_source", &"BlockSource")
            .field("submitter", &"BatchSubmitter")
            .field("store", &"KeyValueStore")
            .field("last_processed_block_number", &self.last_processed_block_number)
            .field("last_tick_block_number", &self.last_tick_block_number)
            .field("shared", &self.shared)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollup_batch_db::{InMemoryStore, LAST_PROCESSED_BLOCK_KEY};
    use rollup_batch_providers::test_utils::{
        block_with_gas_cost, empty_block, InMemoryBlockSource, RecordingSubmitter,
    };
    use std::time::Duration;

    type TestBuilder = BatchBuilder<InMemoryBlockSource, RecordingSubmitter, Arc<InMemoryStore>>;

    async fn builder(
        max_transactions: usize,
    ) -> (TestBuilder, RecordingSubmitter, Arc<InMemoryStore>) {
        let config =
            BatchBuilderConfig::new(Duration::from_secs(3600), 1_000_000, max_transactions);
        let submitter = RecordingSubmitter::default();
        let store = Arc::new(InMemoryStore::default());
        let (builder, _handle) = BatchBuilder::new(
            config,
            InMemoryBlockSource::default(),
            submitter.clone(),
            store.clone(),
        )
        .await
        .unwrap();
        (builder, submitter, store)
    }

    #[tokio::test]
    async fn test_stale_block_is_ignored() -> eyre::Result<()> {
        let (mut builder, submitter, _) = builder(3).await;
        builder.handle_block(block_with_gas_cost(1, 100_000)).await?;

        assert!(!builder.handle_block(block_with_gas_cost(1, 100_000)).await?);
        assert_eq!(builder.last_processed_block_number(), 1);
        assert_eq!(builder.shared.active_batch.read().len(), 1);
        assert!(submitter.batches().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_future_block_is_dropped() -> eyre::Result<()> {
        let (mut builder, _, _) = builder(3).await;
        let mut events = builder.events.subscribe();

        assert!(!builder.handle_block(block_with_gas_cost(2, 100_000)).await?);
        assert_eq!(builder.last_processed_block_number(), 0);
        assert!(builder.shared.active_batch.read().is_empty());

        assert_eq!(
            events.try_recv()?,
            BatchBuilderEvent::FutureBlockDropped { number: 2, expected: 1 }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_block_with_many_transactions_is_fatal() {
        let (mut builder, _, _) = builder(3).await;
        let mut block = block_with_gas_cost(1, 100_000);
        block.transactions.push(block.transactions[0].clone());

        let err = builder.handle_block(block).await.unwrap_err();
        assert!(matches!(err, BatchBuilderError::TooManyTransactions { block: 1, count: 2 }));
        assert_eq!(builder.last_processed_block_number(), 0);
    }

    #[tokio::test]
    async fn test_oversized_block_is_fatal() {
        let (mut builder, submitter, _) = builder(3).await;

        let err = builder.handle_block(block_with_gas_cost(1, 980_000)).await.unwrap_err();
        assert!(matches!(err, BatchBuilderError::BlockExceedsBatchLimits { block: 1, .. }));
        assert!(submitter.batches().is_empty());
    }

    #[tokio::test]
    async fn test_batch_full_on_transaction_count_is_submitted() -> eyre::Result<()> {
        let (mut builder, submitter, store) = builder(2).await;

        assert!(!builder.handle_block(block_with_gas_cost(1, 100_000)).await?);
        assert!(builder.handle_block(block_with_gas_cost(2, 100_000)).await?);

        assert_eq!(submitter.batch_block_numbers(), vec![vec![1, 2]]);
        assert!(builder.shared.active_batch.read().is_empty());
        assert_eq!(store.get(LAST_PROCESSED_BLOCK_KEY).await?, Some(2u64.to_le_bytes().to_vec()));
        Ok(())
    }

    #[tokio::test]
    async fn test_batch_full_on_gas_is_submitted() -> eyre::Result<()> {
        let (mut builder, submitter, store) = builder(3).await;

        // 25_000 + 960_000 leaves no room for a minimal transition under 1_000_000.
        assert!(builder.handle_block(block_with_gas_cost(1, 960_000)).await?);

        assert_eq!(submitter.batch_block_numbers(), vec![vec![1]]);
        assert!(builder.shared.active_batch.read().is_empty());
        assert_eq!(store.get(LAST_PROCESSED_BLOCK_KEY).await?, Some(1u64.to_le_bytes().to_vec()));
        Ok(())
    }

    #[tokio::test]
    async fn test_highest_block_number_does_not_overflow() -> eyre::Result<()> {
        let (mut builder, _, _) = builder(3).await;
        builder.last_processed_block_number = u64::MAX - 1;

        assert!(!builder.handle_block(empty_block(u64::MAX)).await?);
        assert_eq!(builder.last_processed_block_number(), u64::MAX);

        assert!(!builder.handle_block(empty_block(u64::MAX)).await?);
        assert!(!builder.handle_block(block_with_gas_cost(1, 100_000)).await?);
        assert_eq!(builder.last_processed_block_number(), u64::MAX);
        Ok(())
    }

    #[tokio::test]
    async fn test_finalize_is_noop_for_empty_batch() -> eyre::Result<()> {
        let (mut builder, submitter, store) = builder(3).await;
        builder.handle_block(empty_block(1)).await?;

        assert!(!builder.finalize(true).await?);
        assert!(!builder.finalize(false).await?);
        assert!(submitter.batches().is_empty());
        assert!(!store.has(LAST_PROCESSED_BLOCK_KEY).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_finalize_without_force_requires_full_batch() -> eyre::Result<()> {
        let (mut builder, submitter, _) = builder(3).await;
        builder.handle_block(block_with_gas_cost(1, 100_000)).await?;

        assert!(!builder.finalize(false).await?);
        assert!(builder.finalize(true).await?);
        assert_eq!(submitter.batch_block_numbers(), vec![vec![1]]);
        Ok(())
    }

    #[tokio::test]
    async fn test_submission_failure_is_propagated() -> eyre::Result<()> {
        let (mut builder, submitter, store) = builder(3).await;
        builder.handle_block(block_with_gas_cost(1, 100_000)).await?;
        submitter.set_failing(true);

        let err = builder.finalize(true).await.unwrap_err();
        assert!(matches!(err, BatchBuilderError::Provider(_)));
        assert!(!store.has(LAST_PROCESSED_BLOCK_KEY).await?);
        Ok(())
    }
}
