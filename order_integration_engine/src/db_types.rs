use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use log::error;
use oig_common::Secret;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------     IntegrationId     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct IntegrationId(pub i64);

impl IntegrationId {
    /// Orders that arrive through the bulk import endpoint are not tied to a configured integration. They share this
    /// reserved id in the dedup ledger and the sync log.
    pub const MANUAL_IMPORT: IntegrationId = IntegrationId(0);

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for IntegrationId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for IntegrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------    InternalOrderId    ---------------------------------------------------------
/// The identifier the order domain assigned to an order it created on our behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct InternalOrderId(pub i64);

impl InternalOrderId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for InternalOrderId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for InternalOrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------    IntegrationKind    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKind {
    /// We poll the integration's endpoint for new orders.
    Pull,
    /// The integration pushes orders to us, and we push order events to its endpoint (if it has one).
    Push,
}

impl Display for IntegrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationKind::Pull => write!(f, "pull"),
            IntegrationKind::Push => write!(f, "push"),
        }
    }
}

impl FromStr for IntegrationKind {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pull" => Ok(Self::Pull),
            "push" => Ok(Self::Push),
            s => Err(ConversionError(format!("Invalid integration kind: {s}"))),
        }
    }
}

//--------------------------------------    AuthDescriptor     ---------------------------------------------------------
/// How we authenticate against an integration's endpoint. For push subscribers, the secret doubles as the webhook
/// signing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthDescriptor {
    #[default]
    None,
    Basic(Secret<String>),
    Bearer(Secret<String>),
    ApiKey(Secret<String>),
}

impl AuthDescriptor {
    /// Builds a descriptor from the `auth_type` and `auth_value` columns of the integration configuration.
    ///
    /// A credential-bearing scheme with an empty secret is treated as `None`.
    pub fn from_parts(auth_type: &str, auth_value: Option<String>) -> Result<Self, ConversionError> {
        let secret = auth_value.filter(|s| !s.is_empty()).map(Secret::new);
        let descriptor = match (auth_type.to_ascii_lowercase().as_str(), secret) {
            ("none" | "", _) => Self::None,
            (_, None) => Self::None,
            ("basic", Some(s)) => Self::Basic(s),
            ("bearer", Some(s)) => Self::Bearer(s),
            ("apikey", Some(s)) => Self::ApiKey(s),
            (other, _) => return Err(ConversionError(format!("Invalid auth type: {other}"))),
        };
        Ok(descriptor)
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            AuthDescriptor::None => "none",
            AuthDescriptor::Basic(_) => "basic",
            AuthDescriptor::Bearer(_) => "bearer",
            AuthDescriptor::ApiKey(_) => "apikey",
        }
    }

    pub fn secret(&self) -> Option<&Secret<String>> {
        match self {
            AuthDescriptor::None => None,
            AuthDescriptor::Basic(s) | AuthDescriptor::Bearer(s) | AuthDescriptor::ApiKey(s) => Some(s),
        }
    }
}

//--------------------------------------  IntegrationIdentity  ---------------------------------------------------------
/// A configured external system. The core treats these records as read-only input, except for `last_sync`.
#[derive(Debug, Clone)]
pub struct IntegrationIdentity {
    pub id: IntegrationId,
    pub name: String,
    pub kind: IntegrationKind,
    /// The URL we fetch orders from (pull), or deliver events to (push). Push sources without a subscriber endpoint
    /// leave this empty.
    pub endpoint: Option<String>,
    pub auth: AuthDescriptor,
    pub is_active: bool,
    /// Zero means "manual syncs only".
    pub poll_interval: Duration,
    /// Last successful fetch (pull), or last successful webhook delivery (push).
    pub last_sync: Option<DateTime<Utc>>,
}

impl IntegrationIdentity {
    pub fn shared_secret(&self) -> Option<&Secret<String>> {
        self.auth.secret()
    }

    /// True if this is an active pull integration with a poll interval whose last sync is older than that interval.
    pub fn is_due_for_poll(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active || self.kind != IntegrationKind::Pull || self.poll_interval <= Duration::zero() {
            return false;
        }
        match self.last_sync {
            None => true,
            Some(last) => now - last >= self.poll_interval,
        }
    }
}

/// The raw `integration_configs` row. Converted into an [`IntegrationIdentity`] once it leaves the storage layer.
#[derive(Debug, Clone, FromRow)]
pub struct IntegrationRow {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub endpoint: Option<String>,
    pub auth_type: String,
    pub auth_value: Option<String>,
    pub poll_interval_seconds: i64,
    pub is_active: bool,
    pub last_sync: Option<DateTime<Utc>>,
}

impl TryFrom<IntegrationRow> for IntegrationIdentity {
    type Error = ConversionError;

    fn try_from(row: IntegrationRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<IntegrationKind>()?;
        let auth = AuthDescriptor::from_parts(&row.auth_type, row.auth_value).map_err(|e| {
            error!("Integration {} has an invalid auth configuration. {e}", row.name);
            e
        })?;
        let endpoint = row.endpoint.filter(|s| !s.trim().is_empty());
        Ok(Self {
            id: IntegrationId(row.id),
            name: row.name,
            kind,
            endpoint,
            auth,
            is_active: row.is_active,
            poll_interval: Duration::seconds(row.poll_interval_seconds.max(0)),
            last_sync: row.last_sync,
        })
    }
}

//--------------------------------------      DedupMapping     ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DedupMapping {
    pub integration_id: IntegrationId,
    pub external_id: String,
    pub internal_order_id: InternalOrderId,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      SyncTrigger      ---------------------------------------------------------
/// What caused a batch of external orders to be ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTrigger {
    Sync,
    Webhook,
    Import,
}

impl Display for SyncTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncTrigger::Sync => write!(f, "sync"),
            SyncTrigger::Webhook => write!(f, "webhook"),
            SyncTrigger::Import => write!(f, "import"),
        }
    }
}

impl From<String> for SyncTrigger {
    fn from(value: String) -> Self {
        match value.as_str() {
            "webhook" => Self::Webhook,
            "import" => Self::Import,
            "sync" => Self::Sync,
            other => {
                error!("Invalid sync trigger: {other}. But this conversion cannot fail. Defaulting to sync");
                Self::Sync
            },
        }
    }
}

//--------------------------------------      SyncLogEntry     ---------------------------------------------------------
/// An immutable record of one sync run or inbound delivery.
#[derive(Debug, Clone, Serialize)]
pub struct SyncLogEntry {
    pub id: i64,
    pub integration_id: IntegrationId,
    pub trigger: SyncTrigger,
    pub sync_time: DateTime<Utc>,
    pub total_received: i64,
    pub created: i64,
    pub updated: i64,
    pub errors: i64,
    pub error_details: Vec<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SyncLogRow {
    pub id: i64,
    pub integration_id: i64,
    pub sync_trigger: String,
    pub sync_time: DateTime<Utc>,
    pub total_received: i64,
    pub created: i64,
    pub updated: i64,
    pub errors: i64,
    pub error_details: Option<String>,
}

impl From<SyncLogRow> for SyncLogEntry {
    fn from(row: SyncLogRow) -> Self {
        let error_details = row
            .error_details
            .and_then(|s| serde_json::from_str::<Vec<String>>(&s).ok())
            .unwrap_or_default();
        Self {
            id: row.id,
            integration_id: IntegrationId(row.integration_id),
            trigger: SyncTrigger::from(row.sync_trigger),
            sync_time: row.sync_time,
            total_received: row.total_received,
            created: row.created,
            updated: row.updated,
            errors: row.errors,
            error_details,
        }
    }
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
/// The order-domain creation request for one newly ingested external record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}
