/// The error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A database error occurred.
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    /// The stored marker value has an unexpected length.
    #[error("invalid marker value for key [{key}]: expected 8 bytes, got {len}")]
    InvalidMarker {
        /// The key of the marker.
        key: &'static str,
        /// The length of the stored value.
        len: usize,
    },
}
