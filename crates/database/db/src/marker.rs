use crate::{DatabaseError, KeyValueStore};

/// The key under which the last processed block number is stored.
pub const LAST_PROCESSED_BLOCK_KEY: &str = "last_processed_block_number";

/// Reads the last processed block number from the store. Returns 0 if no marker is stored.
pub async fn read_last_processed_block_number<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<u64, DatabaseError> {
    if !store.has(LAST_PROCESSED_BLOCK_KEY).await? {
        return Ok(0)
    }

    let Some(value) = store.get(LAST_PROCESSED_BLOCK_KEY).await? else { return Ok(0) };
    let bytes: [u8; 8] = value.as_slice().try_into().map_err(|_| {
        DatabaseError::InvalidMarker { key: LAST_PROCESSED_BLOCK_KEY, len: value.len() }
    })?;
    Ok(u64::from_le_bytes(bytes))
}

/// Writes the last processed block number to the store as 8 little endian bytes.
pub async fn write_last_processed_block_number<S: KeyValueStore + ?Sized>(
    store: &S,
    block_number: u64,
) -> Result<(), DatabaseError> {
    tracing::trace!(target: "rollup::db", block_number, "Persisting last processed block number.");
    store.put(LAST_PROCESSED_BLOCK_KEY, block_number.to_le_bytes().to_vec()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;

    #[tokio::test]
    async fn test_absent_marker_defaults_to_zero() -> eyre::Result<()> {
        let store = InMemoryStore::default();
        assert_eq!(read_last_processed_block_number(&store).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_marker_is_little_endian() -> eyre::Result<()> {
        let store = InMemoryStore::default();
        write_last_processed_block_number(&store, 0x0102).await?;

        let raw = store.get(LAST_PROCESSED_BLOCK_KEY).await?.unwrap();
        assert_eq!(raw, vec![0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(read_last_processed_block_number(&store).await?, 0x0102);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_marker_length() -> eyre::Result<()> {
        let store = InMemoryStore::default();
        store.put(LAST_PROCESSED_BLOCK_KEY, vec![1, 2, 3]).await?;

        let err = read_last_processed_block_number(&store).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidMarker { len: 3, .. }));
        Ok(())
    }
}
