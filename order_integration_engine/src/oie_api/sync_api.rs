use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;

use crate::{
    db_types::{IntegrationId, IntegrationIdentity, IntegrationKind, SyncLogEntry, SyncTrigger},
    oie_api::{
        errors::IntegrationApiError,
        ingestion::{ingest_batch, persist_result},
        normalizer::normalize,
        sync_objects::SyncRunResult,
    },
    traits::{DedupLedger, IntegrationManagement, OrderCreator, OrderSource, SyncLogManagement},
};

/// How many entries [`SyncApi::sync_history`] returns.
pub const SYNC_HISTORY_LIMIT: i64 = 10;

/// `SyncApi` pulls orders from external systems into the order domain.
///
/// One run fetches the integration's order list, normalizes it, and creates an internal order for every record that
/// the dedup ledger has not seen before. Repeating a run is harmless.
pub struct SyncApi<B, S, O> {
    db: B,
    source: S,
    creator: O,
}

impl<B, S, O> Debug for SyncApi<B, S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SyncApi")
    }
}

impl<B, S, O> SyncApi<B, S, O> {
    pub fn new(db: B, source: S, creator: O) -> Self {
        Self { db, source, creator }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, S, O> SyncApi<B, S, O>
where
    B: IntegrationManagement + DedupLedger + SyncLogManagement,
    S: OrderSource,
    O: OrderCreator,
{
    /// Runs one sync cycle against the integration.
    ///
    /// This never fails. A failed fetch or an unusable body aborts the run, and is reported as a result with one error
    /// and no records. Individual bad records are counted and described in the result, and do not stop the batch.
    ///
    /// `last_sync` is updated whenever the fetch itself succeeded, whatever happened to the records.
    pub async fn run_sync(&self, integration: &IntegrationIdentity) -> SyncRunResult {
        let id = integration.id;
        info!("🔄️ Starting sync for integration {id} ({})", integration.name);
        let (result, fetched) = match self.source.fetch_orders(integration).await {
            Ok(body) => {
                let result = match normalize(&body) {
                    Ok(batch) => {
                        let mut result = SyncRunResult::new(batch.received);
                        ingest_batch(&self.db, &self.creator, id, batch, &mut result).await;
                        result
                    },
                    Err(e) => {
                        warn!("🔄️ Integration {id} returned an unusable body. {e}");
                        SyncRunResult::failed(e.to_string())
                    },
                };
                (result, true)
            },
            Err(e) => {
                warn!("🔄️ Could not fetch orders for integration {id}. {e}");
                (SyncRunResult::failed(format!("Fetch failed. {e}")), false)
            },
        };
        persist_result(&self.db, id, SyncTrigger::Sync, &result).await;
        if fetched {
            if let Err(e) = self.db.mark_synced(id, Utc::now()).await {
                error!("🔄️ Could not update last_sync for integration {id}. {e}");
            }
        }
        info!(
            "🔄️ Sync for integration {id} complete. {} received, {} created, {} updated, {} errors",
            result.total_received, result.created, result.updated, result.errors
        );
        result
    }

    /// Looks up the integration and runs a sync against it.
    ///
    /// Unknown and inactive integrations give [`IntegrationApiError::IntegrationNotFound`], and push integrations,
    /// which have nothing to pull from, give [`IntegrationApiError::WrongKind`].
    pub async fn run_sync_for_id(&self, id: IntegrationId) -> Result<SyncRunResult, IntegrationApiError> {
        let integration = self
            .db
            .fetch_integration(id)
            .await?
            .filter(|i| i.is_active)
            .ok_or(IntegrationApiError::IntegrationNotFound(id))?;
        if integration.kind != IntegrationKind::Pull {
            return Err(IntegrationApiError::WrongKind { id, kind: integration.kind });
        }
        Ok(self.run_sync(&integration).await)
    }

    /// The most recent sync log entries for the integration, newest first.
    pub async fn sync_history(&self, id: IntegrationId) -> Result<Vec<SyncLogEntry>, IntegrationApiError> {
        let logs = self.db.fetch_sync_logs(id, SYNC_HISTORY_LIMIT).await?;
        Ok(logs)
    }

    /// Active pull integrations whose poll interval has elapsed at `now`.
    pub async fn due_integrations(&self, now: DateTime<Utc>) -> Result<Vec<IntegrationIdentity>, IntegrationApiError> {
        let integrations = self.db.fetch_active_integrations(IntegrationKind::Pull).await?;
        Ok(integrations.into_iter().filter(|i| i.is_due_for_poll(now)).collect())
    }

    /// Syncs every due integration, one after the other. Returns the results, keyed by integration id.
    pub async fn run_due_syncs(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<(IntegrationId, SyncRunResult)>, IntegrationApiError> {
        let due = self.due_integrations(now).await?;
        debug!("🔄️ {} integrations are due for a sync", due.len());
        let mut results = Vec::with_capacity(due.len());
        for integration in due {
            let result = self.run_sync(&integration).await;
            results.push((integration.id, result));
        }
        Ok(results)
    }
}
