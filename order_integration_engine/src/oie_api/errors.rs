use thiserror::Error;

use crate::{
    db_types::{IntegrationId, IntegrationKind},
    oie_api::normalizer::NormalizationError,
    traits::StorageError,
};

/// Request-level failures of the sync and inbound APIs.
///
/// Everything that goes wrong *during* a run (fetch failures, bad records, rejected orders) is reported inside the
/// [`SyncRunResult`](crate::oie_api::sync_objects::SyncRunResult) instead.
#[derive(Debug, Clone, Error)]
pub enum IntegrationApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Integration {0} does not exist or is not active")]
    IntegrationNotFound(IntegrationId),
    #[error("No active push integration is named '{0}'")]
    IntegrationNameNotFound(String),
    #[error("Integration {id} is a {kind} integration and cannot be used here")]
    WrongKind { id: IntegrationId, kind: IntegrationKind },
    #[error("Malformed payload. {0}")]
    MalformedPayload(String),
}

impl From<StorageError> for IntegrationApiError {
    fn from(e: StorageError) -> Self {
        IntegrationApiError::DatabaseError(e.to_string())
    }
}

impl From<NormalizationError> for IntegrationApiError {
    fn from(e: NormalizationError) -> Self {
        IntegrationApiError::MalformedPayload(e.to_string())
    }
}
