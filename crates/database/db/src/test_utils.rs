//! Test utilities for the database crate.

use super::Database;

/// Instantiates a new in-memory database and runs the migrations to set up the schema.
pub async fn setup_test_db() -> Database {
    Database::new("sqlite::memory:").await.expect("failed to open in-memory database")
}
