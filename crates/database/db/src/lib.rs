//! A library responsible for persisting the state the batch builder needs to resume after a
//! restart.
//!
//! The only state the builder persists is the last processed block number, stored under
//! [`LAST_PROCESSED_BLOCK_KEY`] in a [`KeyValueStore`].

mod db;
pub use db::Database;

mod error;
pub use error::DatabaseError;

mod marker;
pub use marker::{
    read_last_processed_block_number, write_last_processed_block_number,
    LAST_PROCESSED_BLOCK_KEY,
};

mod memory;
pub use memory::InMemoryStore;

mod metrics;

pub mod models;

mod store;
pub use store::KeyValueStore;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use sea_orm::DbErr;
