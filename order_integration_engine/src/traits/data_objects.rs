use thiserror::Error;

use crate::db_types::InternalOrderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMappingResult {
    Inserted(InternalOrderId),
    /// Another writer recorded a mapping for the same external order first. The winner's internal id is returned.
    AlreadyExists(InternalOrderId),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("A stored record could not be read. {0}")]
    CorruptRecord(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}
