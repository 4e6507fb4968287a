use crate::ProviderError;
use rollup_batch_primitives::TransitionBatch;

/// Implementors of the trait submit finalized transition batches downstream.
///
/// The builder calls [`BatchSubmitter::submit`] at most once per finalized batch and never
/// retries. Implementations are free to retry internally before returning.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BatchSubmitter: Send + Sync {
    /// Submits the batch.
    async fn submit(&self, batch: TransitionBatch) -> Result<(), ProviderError>;
}
