use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::db_types::InternalOrderId;

/// The event name used for every order lifecycle notification.
pub const ORDER_STATUS_CHANGED: &str = "order_status_changed";

/// A domain event about an internal order, to be delivered to webhook subscribers.
///
/// Events are status snapshots, not deltas, so delivering one twice, or out of order, is harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    #[serde(default = "default_event_name")]
    pub event: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub order_id: InternalOrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub status: String,
    /// Event-specific extras, e.g. proof-of-delivery URLs or the courier's position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

fn default_event_name() -> String {
    ORDER_STATUS_CHANGED.to_string()
}

impl OrderEvent {
    /// A plain status change, timestamped now.
    pub fn status_changed<S: Into<String>>(order_id: InternalOrderId, status: S) -> Self {
        Self {
            event: default_event_name(),
            timestamp: Utc::now(),
            order_id,
            external_id: None,
            status: status.into(),
            data: None,
        }
    }

    pub fn with_external_id<S: Into<String>>(mut self, external_id: S) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    /// The order reached the client. The proof URLs are included when the courier captured them.
    pub fn delivered(
        order_id: InternalOrderId,
        delivered_at: DateTime<Utc>,
        signature_url: Option<String>,
        photo_url: Option<String>,
    ) -> Self {
        let mut data = Map::new();
        data.insert("delivered_at".into(), json!(delivered_at));
        if let Some(url) = signature_url {
            data.insert("signature_url".into(), json!(url));
        }
        if let Some(url) = photo_url {
            data.insert("photo_url".into(), json!(url));
        }
        Self::status_changed(order_id, "delivered").with_data(data)
    }

    /// A courier was assigned to the order.
    pub fn assigned(order_id: InternalOrderId, moto_plate: &str, driver_name: &str, eta_minutes: u32) -> Self {
        let mut data = Map::new();
        data.insert("moto_plate".into(), json!(moto_plate));
        data.insert("driver_name".into(), json!(driver_name));
        data.insert("eta_minutes".into(), json!(eta_minutes));
        Self::status_changed(order_id, "assigned").with_data(data)
    }

    /// The courier is on the way. Carries the courier's current position.
    pub fn in_route(order_id: InternalOrderId, current_latitude: f64, current_longitude: f64) -> Self {
        let mut data = Map::new();
        data.insert("current_latitude".into(), json!(current_latitude));
        data.insert("current_longitude".into(), json!(current_longitude));
        Self::status_changed(order_id, "in_route").with_data(data)
    }
}
