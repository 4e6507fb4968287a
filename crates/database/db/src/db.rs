use crate::{metrics::DatabaseMetrics, models::metadata, DatabaseError, KeyValueStore};

use rollup_batch_migration::{Migrator, MigratorTrait};
use sea_orm::{
    sea_query::OnConflict, ActiveValue, Database as SeaOrmDatabase, DatabaseConnection,
    EntityTrait,
};
use std::time::Instant;

/// The [`Database`] struct is responsible for interacting with the database.
///
/// The [`Database`] type wraps a [`sea_orm::DatabaseConnection`] and stores entries in the
/// `metadata` table. It implements [`KeyValueStore`].
pub struct Database {
    /// The underlying database connection.
    connection: DatabaseConnection,
    /// The database metrics.
    metrics: DatabaseMetrics,
}

impl Database {
    /// Creates a new [`Database`] instance associated with the provided database URL and runs the
    /// pending migrations.
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        tracing::info!(target: "rollup::db", database_url, "Connecting to database.");
        let connection = SeaOrmDatabase::connect(database_url).await?;
        Migrator::up(&connection, None).await?;
        Ok(connection.into())
    }
}

impl From<DatabaseConnection> for Database {
    fn from(connection: DatabaseConnection) -> Self {
        Self { connection, metrics: DatabaseMetrics::default() }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("connection", &self.connection).finish()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for Database {
    async fn has(&self, key: &str) -> Result<bool, DatabaseError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DatabaseError> {
        let now = Instant::now();
        let entry = metadata::Entity::find_by_id(key.to_owned()).one(&self.connection).await?;
        self.metrics.read_duration.record(now.elapsed().as_secs_f64());
        Ok(entry.map(|model| model.value))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), DatabaseError> {
        tracing::trace!(target: "rollup::db", key, len = value.len(), "Writing metadata entry.");
        let now = Instant::now();
        let entry = metadata::ActiveModel {
            key: ActiveValue::Set(key.to_owned()),
            value: ActiveValue::Set(value),
        };
        metadata::Entity::insert(entry)
            .on_conflict(
                OnConflict::column(metadata::Column::Key)
                    .update_column(metadata::Column::Value)
                    .to_owned(),
            )
            .exec(&self.connection)
            .await?;
        self.metrics.write_duration.record(now.elapsed().as_secs_f64());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        read_last_processed_block_number, test_utils::setup_test_db,
        write_last_processed_block_number,
    };

    #[tokio::test]
    async fn test_database_put_get_has() -> eyre::Result<()> {
        let db = setup_test_db().await;

        assert!(!db.has("key").await?);
        assert_eq!(db.get("key").await?, None);

        db.put("key", vec![1, 2, 3]).await?;
        assert!(db.has("key").await?);
        assert_eq!(db.get("key").await?, Some(vec![1, 2, 3]));

        Ok(())
    }

    #[tokio::test]
    async fn test_database_put_overwrites() -> eyre::Result<()> {
        let db = setup_test_db().await;

        db.put("key", vec![1]).await?;
        db.put("key", vec![2, 2]).await?;
        assert_eq!(db.get("key").await?, Some(vec![2, 2]));

        Ok(())
    }

    #[tokio::test]
    async fn test_marker_survives_reconnect() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("builder.db").display());

        {
            let db = Database::new(&url).await?;
            write_last_processed_block_number(&db, 42).await?;
        }

        let db = Database::new(&url).await?;
        assert_eq!(read_last_processed_block_number(&db).await?, 42);

        Ok(())
    }
}
