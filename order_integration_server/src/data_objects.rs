use std::fmt::Display;

use order_integration_engine::{
    db_types::{IntegrationId, SyncLogEntry},
    SyncRunResult,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// The response to a manual sync, an inbound delivery or a bulk import.
#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub integration_id: IntegrationId,
    #[serde(flatten)]
    pub result: SyncRunResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatusResponse {
    pub integration_id: IntegrationId,
    pub history: Vec<SyncLogEntry>,
}
