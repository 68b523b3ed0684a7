//! Storage-specific error type wrapping sqlx errors.

use shoplist_domain::error::ShoppingListError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// An order-key component does not fit an `INTEGER` column.
    #[error("order key component {0} out of range")]
    KeyOutOfRange(u64),
}

impl From<StorageError> for ShoppingListError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
