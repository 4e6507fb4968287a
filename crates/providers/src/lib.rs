//! The crate exposes the collaborators of the batch builder: the [`BlockSource`] the builder
//! pulls blocks from and the [`BatchSubmitter`] it hands finalized batches to.

pub use block::BlockSource;
mod block;

pub use error::ProviderError;
mod error;

pub use submitter::BatchSubmitter;
mod submitter;

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;
