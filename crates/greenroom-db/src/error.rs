//! Database-specific error types and conversions.

use greenroom_core::error::GreenroomError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for GreenroomError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => GreenroomError::NotFound { entity, id },
            other => GreenroomError::Database(other.to_string()),
        }
    }
}
