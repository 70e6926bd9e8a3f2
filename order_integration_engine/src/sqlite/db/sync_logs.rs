use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{IntegrationId, SyncLogEntry, SyncLogRow, SyncTrigger},
    oie_api::sync_objects::SyncRunResult,
    traits::StorageError,
};

pub async fn insert_sync_log(
    integration: IntegrationId,
    trigger: SyncTrigger,
    result: &SyncRunResult,
    conn: &mut SqliteConnection,
) -> Result<i64, StorageError> {
    let details = if result.error_details.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&result.error_details).map_err(|e| StorageError::DatabaseError(e.to_string()))?)
    };
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO sync_logs (integration_id, sync_trigger, sync_time, total_received, created, updated, errors, error_details)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id;
        "#,
    )
    .bind(integration.value())
    .bind(trigger.to_string())
    .bind(chrono::Utc::now())
    .bind(result.total_received as i64)
    .bind(result.created as i64)
    .bind(result.updated as i64)
    .bind(result.errors as i64)
    .bind(details)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Sync log #{id} written for integration {integration} ({trigger})");
    Ok(id)
}

pub async fn fetch_sync_logs(
    integration: IntegrationId,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<SyncLogEntry>, sqlx::Error> {
    let rows: Vec<SyncLogRow> =
        sqlx::query_as("SELECT * FROM sync_logs WHERE integration_id = $1 ORDER BY sync_time DESC, id DESC LIMIT $2")
            .bind(integration.value())
            .bind(limit)
            .fetch_all(conn)
            .await?;
    Ok(rows.into_iter().map(SyncLogEntry::from).collect())
}
