use crate::{DatabaseError, KeyValueStore};
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory [`KeyValueStore`]. Its content is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryStore {
    async fn has(&self, key: &str) -> Result<bool, DatabaseError> {
        Ok(self.entries.read().contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DatabaseError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), DatabaseError> {
        self.entries.write().insert(key.to_owned(), value);
        Ok(())
    }
}
