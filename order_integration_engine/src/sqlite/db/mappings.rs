use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{DedupMapping, IntegrationId, InternalOrderId},
    traits::{RecordMappingResult, StorageError},
};

pub async fn fetch_mapping(
    integration: IntegrationId,
    external_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<DedupMapping>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM external_order_mapping WHERE integration_id = $1 AND external_id = $2")
        .bind(integration.value())
        .bind(external_id)
        .fetch_optional(conn)
        .await
}

/// Inserts the mapping unless one already exists for `(integration, external_id)`.
///
/// The `UNIQUE (integration_id, external_id)` constraint decides races between concurrent writers. The loser's insert
/// is a no-op, and it gets the winner's internal id back.
pub async fn idempotent_insert(
    integration: IntegrationId,
    external_id: &str,
    internal_id: InternalOrderId,
    conn: &mut SqliteConnection,
) -> Result<RecordMappingResult, StorageError> {
    let result = sqlx::query(
        r#"
            INSERT INTO external_order_mapping (integration_id, external_id, internal_order_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (integration_id, external_id) DO NOTHING;
        "#,
    )
    .bind(integration.value())
    .bind(external_id)
    .bind(internal_id.value())
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 1 {
        trace!("🗃️ Mapping {integration}/{external_id} -> {internal_id} recorded");
        return Ok(RecordMappingResult::Inserted(internal_id));
    }
    let existing = fetch_mapping(integration, external_id, conn).await?.ok_or_else(|| {
        StorageError::DatabaseError(format!("Mapping {integration}/{external_id} conflicted but could not be read back"))
    })?;
    debug!("🗃️ Mapping {integration}/{external_id} already exists with internal id {}", existing.internal_order_id);
    Ok(RecordMappingResult::AlreadyExists(existing.internal_order_id))
}
