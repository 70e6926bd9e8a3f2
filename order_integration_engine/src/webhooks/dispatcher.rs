use std::{fmt::Debug, sync::Arc};

use chrono::Utc;
use log::*;
use tokio::task::JoinHandle;

use crate::{
    events::OrderEvent,
    traits::{SubscriberRegistry, WebhookTransport},
    webhooks::{
        delivery::{DeliveryOutcome, DeliveryPolicy, WebhookDeliveryAttempt},
        payload::{format_timestamp, WebhookPayload},
    },
};

/// Fans order events out to the webhook subscribers.
pub struct WebhookDispatcher<R, T> {
    registry: Arc<R>,
    transport: Arc<T>,
    policy: DeliveryPolicy,
}

impl<R, T> Clone for WebhookDispatcher<R, T> {
    fn clone(&self) -> Self {
        Self { registry: Arc::clone(&self.registry), transport: Arc::clone(&self.transport), policy: self.policy }
    }
}

impl<R, T> Debug for WebhookDispatcher<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WebhookDispatcher({:?})", self.policy)
    }
}

/// The delivery tasks started by one [`WebhookDispatcher::notify`] call.
///
/// The tasks are detached. Dropping the handle does not cancel them, and each one logs its own outcome.
#[derive(Debug, Default)]
pub struct DispatchHandle {
    tasks: Vec<JoinHandle<DeliveryOutcome>>,
}

impl DispatchHandle {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every delivery loop to finish.
    pub async fn wait(self) -> Vec<DeliveryOutcome> {
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            match task.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("📨️ A webhook delivery task failed. {e}"),
            }
        }
        outcomes
    }
}

impl<R, T> WebhookDispatcher<R, T>
where
    R: SubscriberRegistry + 'static,
    T: WebhookTransport + 'static,
{
    pub fn new(registry: R, transport: T, policy: DeliveryPolicy) -> Self {
        Self { registry: Arc::new(registry), transport: Arc::new(transport), policy }
    }

    pub fn policy(&self) -> &DeliveryPolicy {
        &self.policy
    }

    /// Starts one delivery task per active subscriber and returns without waiting for any of them.
    ///
    /// The payload is serialized once, so every subscriber receives (and has signed) the same bytes. Problems that
    /// prevent any delivery from starting are logged, and give an empty handle.
    pub async fn notify(&self, event: OrderEvent) -> DispatchHandle {
        let subscribers = match self.registry.active_subscribers().await {
            Ok(s) => s,
            Err(e) => {
                error!("📨️ Could not load webhook subscribers. {e}");
                return DispatchHandle::default();
            },
        };
        if subscribers.is_empty() {
            trace!("📨️ No webhook subscribers for {} on order {}", event.event, event.order_id);
            return DispatchHandle::default();
        }
        let payload = WebhookPayload::from(&event);
        let body = match serde_json::to_vec(&payload) {
            Ok(b) => b,
            Err(e) => {
                error!("📨️ Could not serialize the webhook payload for order {}. {e}", event.order_id);
                return DispatchHandle::default();
            },
        };
        let timestamp = format_timestamp(&event.timestamp);
        let mut tasks = Vec::with_capacity(subscribers.len());
        for subscriber in &subscribers {
            let mut attempt = match WebhookDeliveryAttempt::new(subscriber, &event.event, &timestamp, body.clone()) {
                Ok(Some(attempt)) => attempt,
                Ok(None) => continue,
                Err(e) => {
                    error!("📨️ Could not sign the webhook for {}. {e}", subscriber.name);
                    continue;
                },
            };
            let registry = Arc::clone(&self.registry);
            let transport = Arc::clone(&self.transport);
            let policy = self.policy;
            tasks.push(tokio::spawn(async move {
                let outcome = attempt.deliver(transport.as_ref(), &policy).await;
                if let DeliveryOutcome::Delivered { .. } = outcome {
                    if let Err(e) = registry.record_delivery_success(attempt.subscriber, Utc::now()).await {
                        warn!("📨️ Could not record the delivery to {}. {e}", attempt.subscriber_name);
                    }
                }
                outcome
            }));
        }
        debug!("📨️ Dispatched {} to {} subscribers for order {}", event.event, tasks.len(), event.order_id);
        DispatchHandle { tasks }
    }
}
