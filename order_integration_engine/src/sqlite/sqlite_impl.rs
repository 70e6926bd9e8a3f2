//! `SqliteDatabase` is a concrete implementation of an integration gateway backend.
//!
//! It uses SQLite as the backend and implements all the storage traits defined in the [`crate::traits`] module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate, SqlitePool};

use super::db::{db_url, integrations, mappings, new_pool, sync_logs};
use crate::{
    db_types::{IntegrationId, IntegrationIdentity, IntegrationKind, InternalOrderId, SyncLogEntry, SyncTrigger},
    oie_api::sync_objects::SyncRunResult,
    traits::{
        DedupLedger,
        IntegrationGatewayDatabase,
        IntegrationManagement,
        RecordMappingResult,
        StorageError,
        SubscriberRegistry,
        SyncLogManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({}, {:?})", self.url, self.pool)
    }
}

impl IntegrationGatewayDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl IntegrationManagement for SqliteDatabase {
    async fn fetch_integration(&self, id: IntegrationId) -> Result<Option<IntegrationIdentity>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        integrations::fetch_by_id(id, &mut conn).await
    }

    async fn fetch_active_integration_by_name(
        &self,
        name: &str,
        kind: IntegrationKind,
    ) -> Result<Option<IntegrationIdentity>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        integrations::fetch_active_by_name(name, kind, &mut conn).await
    }

    async fn fetch_active_integrations(&self, kind: IntegrationKind) -> Result<Vec<IntegrationIdentity>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        integrations::fetch_active(kind, &mut conn).await
    }

    async fn mark_synced(&self, id: IntegrationId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        integrations::update_last_sync(id, at, &mut conn).await
    }
}

impl DedupLedger for SqliteDatabase {
    async fn lookup_mapping(
        &self,
        integration: IntegrationId,
        external_id: &str,
    ) -> Result<Option<InternalOrderId>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let mapping = mappings::fetch_mapping(integration, external_id, &mut conn).await?;
        Ok(mapping.map(|m| m.internal_order_id))
    }

    async fn record_mapping(
        &self,
        integration: IntegrationId,
        external_id: &str,
        internal_id: InternalOrderId,
    ) -> Result<RecordMappingResult, StorageError> {
        let mut conn = self.pool.acquire().await?;
        mappings::idempotent_insert(integration, external_id, internal_id, &mut conn).await
    }
}

impl SyncLogManagement for SqliteDatabase {
    async fn insert_sync_log(
        &self,
        integration: IntegrationId,
        trigger: SyncTrigger,
        result: &SyncRunResult,
    ) -> Result<i64, StorageError> {
        let mut conn = self.pool.acquire().await?;
        sync_logs::insert_sync_log(integration, trigger, result, &mut conn).await
    }

    async fn fetch_sync_logs(&self, integration: IntegrationId, limit: i64) -> Result<Vec<SyncLogEntry>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let logs = sync_logs::fetch_sync_logs(integration, limit, &mut conn).await?;
        Ok(logs)
    }
}

impl SubscriberRegistry for SqliteDatabase {
    async fn active_subscribers(&self) -> Result<Vec<IntegrationIdentity>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        integrations::fetch_subscribers(&mut conn).await
    }

    async fn record_delivery_success(&self, id: IntegrationId, at: DateTime<Utc>) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        integrations::update_last_sync(id, at, &mut conn).await
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using the URL in `OIG_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. This is idempotent.
    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        migrate!("./src/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migrations failed. {e}")))?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }

    /// Adds an integration record. Used for seeding and tests; the gateway itself never creates integrations.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_integration(
        &self,
        name: &str,
        kind: IntegrationKind,
        endpoint: Option<&str>,
        auth_type: &str,
        auth_value: Option<&str>,
        poll_interval_seconds: i64,
        is_active: bool,
    ) -> Result<IntegrationId, StorageError> {
        let mut conn = self.pool.acquire().await?;
        integrations::insert_integration(
            name,
            kind,
            endpoint,
            auth_type,
            auth_value,
            poll_interval_seconds,
            is_active,
            &mut conn,
        )
        .await
    }
}
