//! Database-specific error types and conversions.

use estateflow_core::error::CrmError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A stored row failed to decode. Scoped to the operation that hit
    /// it; never tears down the process.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for CrmError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CrmError::NotFound { entity, id },
            DbError::Crypto(msg) => CrmError::Internal(msg),
            other => CrmError::Database(other.to_string()),
        }
    }
}
