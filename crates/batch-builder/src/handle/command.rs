use crate::BatchBuilderStatus;
use rollup_batch_primitives::Block;
use tokio::sync::oneshot;

/// The commands that can be sent to the batch builder.
#[derive(Debug)]
pub enum BatchBuilderCommand {
    /// A newly observed block.
    NewBlock(Block),
    /// Report the current status of the builder via the oneshot channel.
    Status(oneshot::Sender<BatchBuilderStatus>),
    /// Stop the builder without finalizing the open batch.
    Shutdown,
}
