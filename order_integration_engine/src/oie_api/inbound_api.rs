use std::fmt::Debug;

use chrono::Utc;
use log::*;

use crate::{
    db_types::{IntegrationId, IntegrationKind, SyncTrigger},
    oie_api::{
        errors::IntegrationApiError,
        ingestion::{ingest_batch, persist_result},
        normalizer::{normalize_import, normalize_inbound, NormalizedBatch},
        sync_objects::SyncRunResult,
    },
    traits::{DedupLedger, IntegrationManagement, OrderCreator, SyncLogManagement},
};

/// `InboundApi` ingests orders that external systems push to us, and manual bulk imports.
///
/// Records go through exactly the same dedup-gated ingestion as a pull sync.
pub struct InboundApi<B, O> {
    db: B,
    creator: O,
}

impl<B, O> Debug for InboundApi<B, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InboundApi")
    }
}

impl<B, O> InboundApi<B, O> {
    pub fn new(db: B, creator: O) -> Self {
        Self { db, creator }
    }
}

impl<B, O> InboundApi<B, O>
where
    B: IntegrationManagement + DedupLedger + SyncLogManagement,
    O: OrderCreator,
{
    /// Ingests an order batch delivered to the webhook of the named push integration.
    ///
    /// The body is a JSON array of orders, or a single order object. Request-level problems (no such active push
    /// integration, a body that is neither) are errors. Everything else is reported in the result.
    pub async fn receive(&self, integration_name: &str, body: &[u8]) -> Result<SyncRunResult, IntegrationApiError> {
        let integration = self
            .db
            .fetch_active_integration_by_name(integration_name, IntegrationKind::Push)
            .await?
            .ok_or_else(|| IntegrationApiError::IntegrationNameNotFound(integration_name.to_string()))?;
        let batch = normalize_inbound(body)?;
        debug!("📥️ {} orders received from integration {integration_name}", batch.received);
        let result = self.ingest(integration.id, SyncTrigger::Webhook, batch).await;
        info!(
            "📥️ Webhook from {integration_name} processed. {} created, {} updated, {} errors",
            result.created, result.updated, result.errors
        );
        Ok(result)
    }

    /// Ingests a manual bulk import under the reserved import integration id.
    ///
    /// Orders without an `external_id` are given one that is unique to this import and their position in the
    /// array, so re-importing the same file creates them again.
    pub async fn import_orders(&self, body: &[u8]) -> Result<SyncRunResult, IntegrationApiError> {
        let tag = import_batch_tag();
        let batch = normalize_import(body, &tag)?;
        debug!("📥️ Importing {} orders", batch.received);
        let result = self.ingest(IntegrationId::MANUAL_IMPORT, SyncTrigger::Import, batch).await;
        info!(
            "📥️ Import complete. {} received, {} created, {} updated, {} errors",
            result.total_received, result.created, result.updated, result.errors
        );
        Ok(result)
    }

    async fn ingest(&self, id: IntegrationId, trigger: SyncTrigger, batch: NormalizedBatch) -> SyncRunResult {
        let mut result = SyncRunResult::new(batch.received);
        ingest_batch(&self.db, &self.creator, id, batch, &mut result).await;
        persist_result(&self.db, id, trigger, &result).await;
        result
    }
}

/// A millisecond timestamp plus a random nonce, so that concurrent imports never share generated ids.
fn import_batch_tag() -> String {
    format!("{}-{:08x}", Utc::now().format("%Y%m%d%H%M%S%3f"), rand::random::<u32>())
}
