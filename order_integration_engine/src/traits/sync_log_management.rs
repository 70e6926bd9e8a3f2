use crate::{
    db_types::{IntegrationId, SyncLogEntry, SyncTrigger},
    oie_api::sync_objects::SyncRunResult,
    traits::StorageError,
};

#[allow(async_fn_in_trait)]
pub trait SyncLogManagement {
    /// Appends a log entry for the result, timestamped now. Returns the id of the new entry.
    async fn insert_sync_log(
        &self,
        integration: IntegrationId,
        trigger: SyncTrigger,
        result: &SyncRunResult,
    ) -> Result<i64, StorageError>;

    /// The most recent `limit` entries for the integration, newest first.
    async fn fetch_sync_logs(&self, integration: IntegrationId, limit: i64) -> Result<Vec<SyncLogEntry>, StorageError>;
}
