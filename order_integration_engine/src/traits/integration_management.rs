use chrono::{DateTime, Utc};

use crate::{
    db_types::{IntegrationId, IntegrationIdentity, IntegrationKind},
    traits::StorageError,
};

/// Read access to the integration configuration records.
///
/// Creating, editing and deleting integrations is the job of the configuration service. The only write the engine
/// performs is [`Self::mark_synced`].
#[allow(async_fn_in_trait)]
pub trait IntegrationManagement {
    /// Fetches an integration by id, whether active or not.
    async fn fetch_integration(&self, id: IntegrationId) -> Result<Option<IntegrationIdentity>, StorageError>;

    async fn fetch_active_integration_by_name(
        &self,
        name: &str,
        kind: IntegrationKind,
    ) -> Result<Option<IntegrationIdentity>, StorageError>;

    /// All active integrations of the given kind, ordered by name.
    async fn fetch_active_integrations(&self, kind: IntegrationKind) -> Result<Vec<IntegrationIdentity>, StorageError>;

    /// Sets `last_sync` for the integration.
    async fn mark_synced(&self, id: IntegrationId, at: DateTime<Utc>) -> Result<(), StorageError>;
}
