use super::{metrics::BatchBuilderHandleMetrics, status::SharedState};
use crate::{ActiveBatchInfo, BatchBuilderError, BatchBuilderEvent, BatchBuilderStatus};

use futures::{Stream, StreamExt};
use rollup_batch_primitives::Block;
use std::sync::Arc;
use tokio::sync::{
    broadcast,
    mpsc::{self, error::TrySendError},
    oneshot,
};
use tokio_stream::wrappers::BroadcastStream;

mod command;
pub use command::BatchBuilderCommand;

/// The handle used to send blocks and commands to the batch builder.
///
/// Handles can be cloned and shared between producers. The builder stops once every handle has
/// been dropped or [`BatchBuilderHandle::shutdown`] has been called.
#[derive(Debug, Clone)]
pub struct BatchBuilderHandle {
    /// The channel used to send commands to the batch builder.
    to_builder_tx: mpsc::Sender<BatchBuilderCommand>,
    /// The sender used by the builder to broadcast events.
    events: broadcast::Sender<BatchBuilderEvent>,
    /// The state shared with the builder.
    shared: Arc<SharedState>,
    handle_metrics: BatchBuilderHandleMetrics,
}

impl BatchBuilderHandle {
    /// Creates a new batch builder handle.
    pub(crate) fn new(
        to_builder_tx: mpsc::Sender<BatchBuilderCommand>,
        events: broadcast::Sender<BatchBuilderEvent>,
        shared: Arc<SharedState>,
    ) -> Self {
        Self { to_builder_tx, events, shared, handle_metrics: BatchBuilderHandleMetrics::default() }
    }

    /// Hands a newly observed block to the builder without waiting.
    ///
    /// Returns [`BatchBuilderError::IntakeQueueFull`] if the intake queue is at capacity, in which
    /// case the caller can retry later.
    pub fn submit_block(&self, block: Block) -> Result<(), BatchBuilderError> {
        self.to_builder_tx.try_send(BatchBuilderCommand::NewBlock(block)).map_err(|err| {
            self.handle_metrics.handle_send_command_failed.increment(1);
            match err {
                TrySendError::Full(_) => BatchBuilderError::IntakeQueueFull,
                TrySendError::Closed(_) => BatchBuilderError::ChannelClosed,
            }
        })
    }

    /// Hands a newly observed block to the builder, waiting for capacity in the intake queue.
    pub async fn send_block(&self, block: Block) -> Result<(), BatchBuilderError> {
        self.send_command(BatchBuilderCommand::NewBlock(block)).await
    }

    /// Returns the current status of the builder, as observed by the builder task.
    pub async fn status(&self) -> Result<BatchBuilderStatus, BatchBuilderError> {
        let (tx, rx) = oneshot::channel();
        self.send_command(BatchBuilderCommand::Status(tx)).await?;
        rx.await.map_err(|_| BatchBuilderError::ChannelClosed)
    }

    /// Requests the builder to stop. The open batch is not finalized, its blocks are replayed
    /// from the block source on the next startup.
    pub async fn shutdown(&self) -> Result<(), BatchBuilderError> {
        self.send_command(BatchBuilderCommand::Shutdown).await
    }

    /// Returns a snapshot of the active batch.
    pub fn active_batch(&self) -> ActiveBatchInfo {
        self.shared.active_batch.read().info()
    }

    /// Returns the last processed block number.
    pub fn last_processed_block_number(&self) -> u64 {
        self.shared.last_processed_block_number()
    }

    /// Returns true if the builder is replaying blocks from the block source.
    pub fn is_syncing(&self) -> bool {
        self.shared.is_syncing()
    }

    /// Returns a stream of the events emitted by the builder from now on.
    ///
    /// Events are dropped for listeners that fall too far behind.
    pub fn events(&self) -> impl Stream<Item = BatchBuilderEvent> + Send + Unpin + 'static {
        BroadcastStream::new(self.events.subscribe())
            .filter_map(|event| futures::future::ready(event.ok()))
    }

    async fn send_command(&self, command: BatchBuilderCommand) -> Result<(), BatchBuilderError> {
        self.to_builder_tx.send(command).await.map_err(|_| {
            self.handle_metrics.handle_send_command_failed.increment(1);
            BatchBuilderError::ChannelClosed
        })
    }
}
