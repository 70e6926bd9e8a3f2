use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{db_types::InternalOrderId, events::OrderEvent};

pub const EVENT_NAME_HEADER: &str = "X-Event-Name";
pub const EVENT_TIMESTAMP_HEADER: &str = "X-Event-Timestamp";
pub const EVENT_SIGNATURE_HEADER: &str = "X-Event-Signature";

/// The JSON body POSTed to webhook subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: String,
    /// RFC3339, whole seconds, UTC
    pub timestamp: String,
    pub order_id: InternalOrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<&OrderEvent> for WebhookPayload {
    fn from(event: &OrderEvent) -> Self {
        Self {
            event: event.event.clone(),
            timestamp: format_timestamp(&event.timestamp),
            order_id: event.order_id,
            external_id: event.external_id.clone(),
            status: event.status.clone(),
            data: event.data.clone(),
        }
    }
}

/// One HTTP POST, ready for a [`WebhookTransport`](crate::traits::WebhookTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    pub endpoint: String,
    /// Headers besides `Content-Type`, which is always `application/json`.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl WebhookRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}
