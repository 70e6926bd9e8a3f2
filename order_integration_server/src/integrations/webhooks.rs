use log::*;
use order_integration_engine::{
    events::{EventHandlers, EventHooks},
    traits::{SubscriberRegistry, WebhookTransport},
    webhooks::DeliveryOutcome,
    WebhookDispatcher,
};

pub const WEBHOOK_EVENT_BUFFER_SIZE: usize = 25;

/// Hooks the webhook dispatcher up to the order event queue.
///
/// Every [`OrderEvent`](order_integration_engine::events::OrderEvent) that is published is handed to the dispatcher,
/// which POSTs it to each active subscriber. The handler job waits for the deliveries to finish, so that a shutting
/// down event handler drains them before it exits. Failed deliveries are logged, and never retried beyond the
/// dispatcher's policy.
pub fn create_webhook_event_handlers<R, T>(dispatcher: WebhookDispatcher<R, T>) -> EventHandlers
where
    R: SubscriberRegistry + 'static,
    T: WebhookTransport + 'static,
{
    let mut hooks = EventHooks::default();
    hooks.on_order_event(move |ev| {
        let dispatcher = dispatcher.clone();
        Box::pin(async move {
            let order_id = ev.order_id;
            let handle = dispatcher.notify(ev).await;
            if handle.is_empty() {
                return;
            }
            let outcomes = handle.wait().await;
            let failed = outcomes.iter().filter(|o| matches!(o, DeliveryOutcome::Failed { .. })).count();
            if failed > 0 {
                warn!("📨️ {failed} of {} webhook deliveries for order {order_id} failed", outcomes.len());
            } else {
                debug!("📨️ All {} webhook deliveries for order {order_id} succeeded", outcomes.len());
            }
        })
    });
    EventHandlers::new(WEBHOOK_EVENT_BUFFER_SIZE, hooks)
}
