use std::{future::Future, pin::Pin, sync::Arc};

use tokio::task::JoinHandle;

use crate::events::{EventHandler, EventProducer, Handler, OrderEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_event_producer: Vec<EventProducer<OrderEvent>>,
}

impl EventProducers {
    /// Publishes the event to every registered handler. Waits only for queue space, never for the handlers.
    pub async fn publish_order_event(&self, event: OrderEvent) {
        for producer in &self.order_event_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    /// Queues the event on every handler without waiting. Returns false if any queue refused it.
    pub fn try_publish_order_event(&self, event: OrderEvent) -> bool {
        self.order_event_producer
            .iter()
            .fold(true, |queued, producer| producer.try_publish_event(event.clone()) && queued)
    }
}

pub struct EventHandlers {
    pub on_order_event: Option<EventHandler<OrderEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_event = hooks.on_order_event.map(|f| EventHandler::new(buffer_size, f));
        Self { on_order_event }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_order_event {
            result.order_event_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns each handler loop. A handle resolves once its producers are gone and its in-flight jobs are done.
    pub fn start_handlers(self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        if let Some(handler) = self.on_order_event {
            handles.push(tokio::spawn(async move {
                handler.start_handler().await;
            }));
        }
        handles
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_event: Option<Handler<OrderEvent>>,
}

impl EventHooks {
    pub fn on_order_event<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_event = Some(Arc::new(f));
        self
    }
}
