//! Outbound HTTP for the order integration gateway.
//!
//! Each client here implements one of the engine's outbound seams on top of a shared `reqwest` client:
//! * [`OrderSourceApi`] fetches order lists from pull integrations ([`OrderSource`](order_integration_engine::traits::OrderSource)),
//! * [`OrderServiceApi`] creates internal orders ([`OrderCreator`](order_integration_engine::traits::OrderCreator)),
//! * [`WebhookClient`] POSTs webhook payloads ([`WebhookTransport`](order_integration_engine::traits::WebhookTransport)).
mod api;
mod auth;
#[cfg(test)]
mod canned_http;
mod config;
mod error;
mod order_service;
mod webhook_client;

pub use api::OrderSourceApi;
pub use auth::{auth_header, API_KEY_HEADER, BASIC_AUTH_USERNAME};
pub use config::SourceToolsConfig;
pub use error::SourceToolsError;
pub use order_service::OrderServiceApi;
pub use webhook_client::WebhookClient;
