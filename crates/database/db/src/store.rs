use crate::DatabaseError;

/// A minimal key-value interface used to persist the batch builder state.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait KeyValueStore: Send + Sync {
    /// Returns true if a value is stored under the key.
    async fn has(&self, key: &str) -> Result<bool, DatabaseError>;

    /// Returns the value stored under the key, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DatabaseError>;

    /// Stores the value under the key, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), DatabaseError>;
}
