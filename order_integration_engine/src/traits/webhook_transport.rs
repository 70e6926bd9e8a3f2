use std::future::Future;

use thiserror::Error;

use crate::webhooks::WebhookRequest;

#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Webhook request failed. {0}")]
    Transport(String),
    #[error("Webhook request timed out")]
    Timeout,
}

/// Sends a single webhook POST and reports the response status.
///
/// Retrying is the caller's business; implementations should make exactly one attempt.
pub trait WebhookTransport: Send + Sync {
    fn post(&self, request: &WebhookRequest) -> impl Future<Output = Result<u16, DeliveryError>> + Send;
}
