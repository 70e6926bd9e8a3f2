use chrono::{DateTime, Utc};
use log::{error, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{IntegrationId, IntegrationIdentity, IntegrationKind, IntegrationRow},
    traits::StorageError,
};

/// Rows that cannot be converted are logged and skipped.
fn into_identities(rows: Vec<IntegrationRow>) -> Vec<IntegrationIdentity> {
    rows.into_iter()
        .filter_map(|r| {
            let (id, name) = (r.id, r.name.clone());
            IntegrationIdentity::try_from(r)
                .map_err(|e| error!("🗃️ Skipping integration #{id} ({name}). Its configuration is invalid. {e}"))
                .ok()
        })
        .collect()
}

pub async fn fetch_by_id(
    id: IntegrationId,
    conn: &mut SqliteConnection,
) -> Result<Option<IntegrationIdentity>, StorageError> {
    let row: Option<IntegrationRow> = sqlx::query_as("SELECT * FROM integration_configs WHERE id = $1")
        .bind(id.value())
        .fetch_optional(conn)
        .await?;
    row.map(IntegrationIdentity::try_from).transpose().map_err(|e| StorageError::CorruptRecord(e.to_string()))
}

pub async fn fetch_active_by_name(
    name: &str,
    kind: IntegrationKind,
    conn: &mut SqliteConnection,
) -> Result<Option<IntegrationIdentity>, StorageError> {
    let row: Option<IntegrationRow> =
        sqlx::query_as("SELECT * FROM integration_configs WHERE name = $1 AND kind = $2 AND is_active = 1")
            .bind(name)
            .bind(kind.to_string())
            .fetch_optional(conn)
            .await?;
    row.map(IntegrationIdentity::try_from).transpose().map_err(|e| StorageError::CorruptRecord(e.to_string()))
}

pub async fn fetch_active(
    kind: IntegrationKind,
    conn: &mut SqliteConnection,
) -> Result<Vec<IntegrationIdentity>, StorageError> {
    let rows: Vec<IntegrationRow> =
        sqlx::query_as("SELECT * FROM integration_configs WHERE kind = $1 AND is_active = 1 ORDER BY name")
            .bind(kind.to_string())
            .fetch_all(conn)
            .await?;
    Ok(into_identities(rows))
}

/// Active push integrations with a non-blank endpoint
pub async fn fetch_subscribers(conn: &mut SqliteConnection) -> Result<Vec<IntegrationIdentity>, StorageError> {
    let rows: Vec<IntegrationRow> = sqlx::query_as(
        r#"
            SELECT * FROM integration_configs
            WHERE kind = 'push' AND is_active = 1 AND endpoint IS NOT NULL AND trim(endpoint) <> ''
            ORDER BY name
        "#,
    )
    .fetch_all(conn)
    .await?;
    Ok(into_identities(rows))
}

pub async fn update_last_sync(
    id: IntegrationId,
    at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<(), StorageError> {
    let result = sqlx::query("UPDATE integration_configs SET last_sync = $1 WHERE id = $2")
        .bind(at)
        .bind(id.value())
        .execute(conn)
        .await?;
    trace!("🗃️ last_sync for integration {id} set to {at}. {} rows affected", result.rows_affected());
    Ok(())
}

/// Test and seeding helper. Integrations are normally managed by the configuration service.
#[allow(clippy::too_many_arguments)]
pub async fn insert_integration(
    name: &str,
    kind: IntegrationKind,
    endpoint: Option<&str>,
    auth_type: &str,
    auth_value: Option<&str>,
    poll_interval_seconds: i64,
    is_active: bool,
    conn: &mut SqliteConnection,
) -> Result<IntegrationId, StorageError> {
    let id: i64 = sqlx::query_scalar(
        r#"
            INSERT INTO integration_configs (name, kind, endpoint, auth_type, auth_value, poll_interval_seconds, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id;
        "#,
    )
    .bind(name)
    .bind(kind.to_string())
    .bind(endpoint)
    .bind(auth_type)
    .bind(auth_value)
    .bind(poll_interval_seconds)
    .bind(is_active)
    .fetch_one(conn)
    .await?;
    Ok(IntegrationId(id))
}
