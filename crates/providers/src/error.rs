/// An error occurring at one of the batch builder collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The block source failed to return a block.
    #[error("block source error: {0}")]
    BlockSource(String),
    /// The submitter failed to submit a batch.
    #[error("batch submission failed: {0}")]
    Submission(String),
}
