use rollup_batch_db::DatabaseError;
use rollup_batch_providers::ProviderError;

/// An error type for the batch builder.
///
/// Every variant except [`BatchBuilderError::IntakeQueueFull`] is fatal for the consumer loop.
#[derive(Debug, thiserror::Error)]
pub enum BatchBuilderError {
    /// The block carries more than one transaction.
    #[error("block {block} carries {count} transactions, at most one is supported")]
    TooManyTransactions {
        /// The block number.
        block: u64,
        /// The number of transactions in the block.
        count: usize,
    },
    /// The block does not fit in an empty batch.
    #[error("block {block} with estimated gas {gas} does not fit in an empty batch")]
    BlockExceedsBatchLimits {
        /// The block number.
        block: u64,
        /// The estimated gas of the block.
        gas: u64,
    },
    /// The block source returned a block with a different number than requested.
    #[error("block source returned block {got} when block {requested} was requested")]
    UnexpectedBlockNumber {
        /// The requested block number.
        requested: u64,
        /// The returned block number.
        got: u64,
    },
    /// The stored last processed block number leaves no room for a following block.
    #[error("invalid last processed block number {0}")]
    InvalidMarker(u64),
    /// The batch builder encountered an error interacting with one of its collaborators.
    #[error("Encountered an error interacting with a provider: {0}")]
    Provider(#[from] ProviderError),
    /// The batch builder encountered an error interacting with the database.
    #[error("Encountered an error interacting with the database: {0}")]
    Database(#[from] DatabaseError),
    /// The intake queue is full. The block can be submitted again later.
    #[error("Intake queue is full")]
    IntakeQueueFull,
    /// The command channel to the batch builder was closed.
    #[error("Command channel closed")]
    ChannelClosed,
    /// The configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
