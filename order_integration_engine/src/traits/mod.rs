//! # Interface contracts of the integration engine.
//!
//! The engine is provider-agnostic. It never opens a socket or a database connection on its own; everything it needs
//! from the outside world is expressed as one of the traits in this module, and the concrete implementations are
//! injected by whoever constructs the APIs (the server, or a test).
//!
//! ## Storage
//! * [`IntegrationManagement`] gives read access to the configured integrations, and lets the sync engine stamp the
//!   time of the last successful fetch.
//! * [`DedupLedger`] is the idempotency gate for ingestion. Its uniqueness constraint on
//!   `(integration, external id)` is the *only* thing standing between a repeated sync and a duplicate order.
//! * [`SyncLogManagement`] stores the immutable summaries of every sync run and inbound delivery.
//! * [`SubscriberRegistry`] lists the webhook subscribers and records successful deliveries. Its futures are `Send`,
//!   since they are awaited from detached delivery tasks.
//!
//! [`IntegrationGatewayDatabase`] bundles the four storage traits for backends that provide all of them.
//!
//! ## Outbound
//! * [`OrderSource`] fetches the raw order list from a pull integration.
//! * [`OrderCreator`] asks the order domain to create an internal order.
//! * [`WebhookTransport`] performs a single webhook POST.
mod data_objects;
mod dedup_ledger;
mod integration_management;
mod order_creator;
mod order_source;
mod subscriber_registry;
mod sync_log_management;
mod webhook_transport;

pub use data_objects::{RecordMappingResult, StorageError};
pub use dedup_ledger::DedupLedger;
pub use integration_management::IntegrationManagement;
pub use order_creator::{OrderCreationError, OrderCreator};
pub use order_source::{FetchError, OrderSource};
pub use subscriber_registry::SubscriberRegistry;
pub use sync_log_management::SyncLogManagement;
pub use webhook_transport::{DeliveryError, WebhookTransport};

/// The highest level of behaviour for storage backends supporting the integration gateway.
pub trait IntegrationGatewayDatabase:
    IntegrationManagement + DedupLedger + SyncLogManagement + SubscriberRegistry + Clone
{
    /// The URL of the database
    fn url(&self) -> &str;
}
