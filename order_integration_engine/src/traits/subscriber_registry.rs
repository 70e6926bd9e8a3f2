use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
    db_types::{IntegrationId, IntegrationIdentity},
    traits::StorageError,
};

/// The webhook subscriber list.
///
/// Unlike the other storage traits, the futures returned here must be `Send`: they are awaited from detached
/// delivery tasks running on the multithreaded runtime.
pub trait SubscriberRegistry: Send + Sync {
    /// Active push integrations that have an endpoint to deliver to.
    fn active_subscribers(&self) -> impl Future<Output = Result<Vec<IntegrationIdentity>, StorageError>> + Send;

    /// Stamps `last_sync` for the subscriber after a successful delivery.
    fn record_delivery_success(
        &self,
        id: IntegrationId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
