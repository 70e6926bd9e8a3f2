use std::time::Duration;

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use order_integration_engine::{
    db_types::InternalOrderId,
    events::{EventHandlers, EventHooks, EventProducers, OrderEvent, ORDER_STATUS_CHANGED},
};
use serde_json::Value;
use tokio::sync::mpsc;

use super::helpers::post_request;
use crate::routes::publish_order_event;

fn configure(producers: EventProducers) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(producers)).service(publish_order_event);
    }
}

fn forwarding_handlers(buffer_size: usize) -> (EventHandlers, mpsc::UnboundedReceiver<OrderEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut hooks = EventHooks::default();
    hooks.on_order_event(move |ev| {
        let tx = tx.clone();
        Box::pin(async move {
            let _ = tx.send(ev);
        })
    });
    (EventHandlers::new(buffer_size, hooks), rx)
}

#[actix_web::test]
async fn published_events_reach_the_handler() {
    let (handlers, mut rx) = forwarding_handlers(25);
    let producers = handlers.producers();
    let _tasks = handlers.start_handlers();

    let event = r#"{"order_id": 42, "external_id": "A1", "status": "in_route", "data": {"current_latitude": 4.6}}"#;
    let (status, body) = post_request("/events/orders", event, configure(producers)).await.unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["success"], true);

    let received = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await.unwrap().unwrap();
    assert_eq!(received.order_id, InternalOrderId(42));
    assert_eq!(received.event, ORDER_STATUS_CHANGED);
    assert_eq!(received.external_id.as_deref(), Some("A1"));
    assert_eq!(received.status, "in_route");
}

#[actix_web::test]
async fn full_queue_is_reported() {
    // The handler is never started, so nothing drains the queue
    let (handlers, _rx) = forwarding_handlers(1);
    let producers = handlers.producers();

    let event = r#"{"order_id": 1, "status": "delivered"}"#;
    let (status, _) = post_request("/events/orders", event, configure(producers.clone())).await.unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    let (status, body) = post_request("/events/orders", event, configure(producers)).await.unwrap();
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.contains("queue is full"));
    drop(handlers);
}

#[actix_web::test]
async fn events_without_an_order_id_are_rejected() {
    let (handlers, _rx) = forwarding_handlers(1);
    let (status, _) =
        post_request("/events/orders", r#"{"status": "delivered"}"#, configure(handlers.producers())).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
