use thiserror::Error;

/// Errors that can occur when interacting with a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("Unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    /// A stored row holds a value outside its closed set.
    #[error("Corrupt row: {0}")]
    Decode(String),

    /// The backend refused the call.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Returns true if this error is a violation of the named constraint.
    pub fn is_conflict_on(&self, name: &str) -> bool {
        matches!(self, StoreError::Conflict { constraint } if constraint == name)
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
