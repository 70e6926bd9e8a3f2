//! The per-subscriber delivery loop.
//!
//! Each attempt is one POST, bounded by [`DeliveryPolicy::attempt_timeout`]. A 2xx response ends the loop at once.
//! Otherwise the loop sleeps `attempt * base_delay` and tries again, up to [`DeliveryPolicy::max_attempts`] attempts
//! in total. Attempts are strictly sequential.
use std::time::Duration;

use log::*;

use crate::{
    db_types::{IntegrationId, IntegrationIdentity},
    traits::WebhookTransport,
    webhooks::{
        payload::WebhookRequest,
        sign_payload,
        SignatureError,
        EVENT_NAME_HEADER,
        EVENT_SIGNATURE_HEADER,
        EVENT_TIMESTAMP_HEADER,
    },
};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl DeliveryPolicy {
    /// The pause after the given (1-based) failed attempt. Grows linearly, saturating at `Duration::MAX`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.checked_mul(attempt).unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Pending,
    Delivered { attempts: u32 },
    Failed { attempts: u32 },
}

/// The state of one event's delivery to one subscriber. Lives only as long as the delivery task.
#[derive(Debug, Clone)]
pub struct WebhookDeliveryAttempt {
    pub subscriber: IntegrationId,
    pub subscriber_name: String,
    pub request: WebhookRequest,
    pub signature: Option<String>,
    /// Attempts made so far
    pub attempt: u32,
    pub outcome: DeliveryOutcome,
}

impl WebhookDeliveryAttempt {
    /// Prepares delivery of an already serialized payload to `subscriber`.
    ///
    /// Returns `Ok(None)` for subscribers without an endpoint. When the subscriber has a shared secret, the body is
    /// signed and the signature header is added.
    pub fn new(
        subscriber: &IntegrationIdentity,
        event_name: &str,
        timestamp: &str,
        body: Vec<u8>,
    ) -> Result<Option<Self>, SignatureError> {
        let Some(endpoint) = subscriber.endpoint.clone() else {
            return Ok(None);
        };
        let mut headers = vec![
            (EVENT_NAME_HEADER.to_string(), event_name.to_string()),
            (EVENT_TIMESTAMP_HEADER.to_string(), timestamp.to_string()),
        ];
        let signature = match subscriber.shared_secret() {
            Some(secret) => Some(sign_payload(secret.reveal(), &body)?),
            None => None,
        };
        if let Some(sig) = &signature {
            headers.push((EVENT_SIGNATURE_HEADER.to_string(), sig.clone()));
        }
        Ok(Some(Self {
            subscriber: subscriber.id,
            subscriber_name: subscriber.name.clone(),
            request: WebhookRequest { endpoint, headers, body },
            signature,
            attempt: 0,
            outcome: DeliveryOutcome::Pending,
        }))
    }

    /// Runs the retry loop to completion and returns the final outcome.
    pub async fn deliver<T: WebhookTransport>(&mut self, transport: &T, policy: &DeliveryPolicy) -> DeliveryOutcome {
        let name = self.subscriber_name.as_str();
        while self.attempt < policy.max_attempts {
            self.attempt += 1;
            let attempt = self.attempt;
            match tokio::time::timeout(policy.attempt_timeout, transport.post(&self.request)).await {
                Ok(Ok(status)) if (200..300).contains(&status) => {
                    debug!("📨️ Webhook delivered to {name} on attempt {attempt} (status {status})");
                    self.outcome = DeliveryOutcome::Delivered { attempts: attempt };
                    return self.outcome;
                },
                Ok(Ok(status)) => warn!("📨️ Webhook attempt {attempt} to {name} was answered with status {status}"),
                Ok(Err(e)) => warn!("📨️ Webhook attempt {attempt} to {name} failed. {e}"),
                Err(_) => warn!("📨️ Webhook attempt {attempt} to {name} timed out"),
            }
            if attempt < policy.max_attempts {
                tokio::time::sleep(policy.backoff(attempt)).await;
            }
        }
        error!("📨️ Giving up on webhook delivery to {name} after {} attempts", self.attempt);
        self.outcome = DeliveryOutcome::Failed { attempts: self.attempt };
        self.outcome
    }
}
