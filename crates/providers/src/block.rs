use crate::ProviderError;
use rollup_batch_primitives::Block;

/// Implementors of the trait can provide execution layer blocks by number.
///
/// A block returned once for a given number must never change afterwards.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BlockSource: Send + Sync {
    /// Returns the block at the provided number, or `None` if the block has not been produced yet.
    async fn block_by_number(&self, number: u64) -> Result<Option<Block>, ProviderError>;
}
