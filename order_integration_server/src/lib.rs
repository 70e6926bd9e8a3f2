//! # Order Integration Gateway server
//! This crate hosts the HTTP surface of the gateway. It is responsible for:
//! * Running syncs against pull integrations, on demand and on a schedule (see [sync_worker]).
//! * Receiving orders pushed by push integrations, and bulk imports.
//! * Accepting order events from the order domain and handing them to the webhook dispatcher.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `POST /sync/{id}`: Runs a sync against the given pull integration.
//! * `GET /sync/status/{id}`: The most recent sync log entries for an integration.
//! * `POST /webhook/{integration_name}`: Orders pushed by a push integration.
//! * `POST /import/orders`: Bulk import of orders.
//! * `POST /events/orders`: Publishes an order event to the webhook subscribers.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod sync_worker;

#[cfg(test)]
mod endpoint_tests;
