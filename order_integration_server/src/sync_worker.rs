use std::time::Duration;

use chrono::Utc;
use log::*;
use order_integration_engine::{SqliteDatabase, SyncApi};
use source_tools::{OrderServiceApi, OrderSourceApi};
use tokio::task::JoinHandle;

/// Starts the scheduled sync worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// On every tick, each active pull integration whose poll interval has elapsed is synced, one after the other.
pub fn start_sync_worker(
    api: SyncApi<SqliteDatabase, OrderSourceApi, OrderServiceApi>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        info!("🕰️ Scheduled sync worker started. Checking for due integrations every {}s", interval.as_secs());
        loop {
            timer.tick().await;
            debug!("🕰️ Running scheduled sync job");
            match api.run_due_syncs(Utc::now()).await {
                Ok(results) if results.is_empty() => trace!("🕰️ No integrations were due"),
                Ok(results) => {
                    info!("🕰️ {} scheduled syncs completed", results.len());
                    for (id, result) in results {
                        debug!(
                            "🕰️ Integration {id}: {} received, {} created, {} updated, {} errors",
                            result.total_received, result.created, result.updated, result.errors
                        );
                    }
                },
                Err(e) => {
                    error!("🕰️ Error running scheduled sync job: {e}");
                },
            }
        }
    })
}
