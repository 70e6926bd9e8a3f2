use crate::{
    db_types::{IntegrationId, InternalOrderId},
    traits::{RecordMappingResult, StorageError},
};

/// Persistent mapping from `(integration, external order id)` to the internal order created for it.
///
/// Mappings are created exactly once, never updated, and never deleted by the engine.
#[allow(async_fn_in_trait)]
pub trait DedupLedger {
    /// Returns the internal order id for the external order, or `None` if it has not been ingested yet.
    async fn lookup_mapping(
        &self,
        integration: IntegrationId,
        external_id: &str,
    ) -> Result<Option<InternalOrderId>, StorageError>;

    /// Records a new mapping.
    ///
    /// Implementations must be safe under concurrent callers racing on the same `(integration, external_id)`:
    /// exactly one caller receives `Inserted`, the others receive `AlreadyExists` with the winner's internal id.
    /// This must be enforced by the store's uniqueness constraint, not by an in-process lock.
    async fn record_mapping(
        &self,
        integration: IntegrationId,
        external_id: &str,
        internal_id: InternalOrderId,
    ) -> Result<RecordMappingResult, StorageError>;
}
