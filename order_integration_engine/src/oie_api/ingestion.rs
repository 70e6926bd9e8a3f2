//! The dedup-gated ingestion step shared by pull syncs, inbound webhooks and imports.
use log::*;

use crate::{
    db_types::{IntegrationId, InternalOrderId, SyncTrigger},
    oie_api::{
        normalizer::NormalizedBatch,
        sync_objects::{ExternalOrderRecord, RecordRejected, SyncRunResult},
    },
    traits::{DedupLedger, OrderCreator, RecordMappingResult, SyncLogManagement},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Created(InternalOrderId),
    /// The record was ingested before; nothing was done.
    AlreadyIngested(InternalOrderId),
}

/// Ingests one record.
///
/// The ledger is consulted first, and an internal order is only created on a miss. If another writer records the
/// same external order between our lookup and our insert, the ledger keeps the winner's mapping and the record counts
/// as already ingested. The order created here is then orphaned, and a warning says so.
pub async fn ingest_record<B, O>(
    db: &B,
    creator: &O,
    integration: IntegrationId,
    record: &ExternalOrderRecord,
) -> Result<IngestOutcome, RecordRejected>
where
    B: DedupLedger,
    O: OrderCreator,
{
    let external_id = record.external_id.as_str();
    let ledger_err = |source| RecordRejected::Ledger { external_id: external_id.to_string(), source };
    if let Some(existing) = db.lookup_mapping(integration, external_id).await.map_err(ledger_err)? {
        trace!("🔄️ Order {external_id} from integration {integration} is already ingested as {existing}");
        return Ok(IngestOutcome::AlreadyIngested(existing));
    }
    let order = record.to_new_order();
    let internal_id = creator
        .create_order(&order)
        .await
        .map_err(|source| RecordRejected::Creation { external_id: external_id.to_string(), source })?;
    match db.record_mapping(integration, external_id, internal_id).await.map_err(ledger_err)? {
        RecordMappingResult::Inserted(id) => {
            debug!("🔄️ Order {external_id} from integration {integration} ingested as {id}");
            Ok(IngestOutcome::Created(id))
        },
        RecordMappingResult::AlreadyExists(winner) => {
            warn!(
                "🔄️ Order {external_id} from integration {integration} was ingested concurrently as {winner}. Order \
                 {internal_id} created by this run is orphaned."
            );
            Ok(IngestOutcome::AlreadyIngested(winner))
        },
    }
}

/// Runs every record in the batch through [`ingest_record`] and tallies the outcomes into `result`.
///
/// Records the normalizer rejected are counted as errors first. Records are processed sequentially, and a failure
/// never stops the rest of the batch.
pub async fn ingest_batch<B, O>(
    db: &B,
    creator: &O,
    integration: IntegrationId,
    batch: NormalizedBatch,
    result: &mut SyncRunResult,
) where
    B: DedupLedger,
    O: OrderCreator,
{
    for rejected in batch.rejected {
        debug!("🔄️ Integration {integration}: {rejected}");
        result.record_error(rejected.to_string());
    }
    for record in &batch.records {
        match ingest_record(db, creator, integration, record).await {
            Ok(IngestOutcome::Created(_)) => result.record_created(),
            Ok(IngestOutcome::AlreadyIngested(_)) => result.record_updated(),
            Err(e) => {
                warn!("🔄️ Integration {integration}: {e}");
                result.record_error(e.to_string());
            },
        }
    }
}

/// Appends the run summary to the sync log. A failure to write the log is logged, and otherwise ignored, since the
/// orders have been ingested already.
pub async fn persist_result<B: SyncLogManagement>(
    db: &B,
    integration: IntegrationId,
    trigger: SyncTrigger,
    result: &SyncRunResult,
) {
    match db.insert_sync_log(integration, trigger, result).await {
        Ok(id) => trace!("🔄️ Sync log #{id} saved for integration {integration}"),
        Err(e) => error!("🔄️ Could not save the {trigger} log for integration {integration}. {e}"),
    }
}
