//! Order Integration Engine
//!
//! The order integration engine connects the internal order platform to third-party order sources, and notifies
//! external subscribers of order lifecycle events. This library contains the core logic. It is provider-agnostic: it
//! never opens a network connection itself, but talks to the world through the seams in [`mod@traits`].
//!
//! The library is divided into these main sections:
//! 1. Storage ([`mod@traits`] and the SQLite backend, [`SqliteDatabase`]). The dedup ledger lives here, and it is what
//!    guarantees that an external order is ingested at most once, however often it is seen.
//! 2. The ingestion API ([`mod@oie_api`]). [`SyncApi`] pulls order lists from external systems, and [`InboundApi`]
//!    accepts orders pushed to us. Both normalize the heterogeneous payloads, check each record against the ledger,
//!    and create internal orders for the new ones.
//! 3. Outbound webhooks ([`mod@webhooks`]). The [`WebhookDispatcher`] delivers signed order events to every active
//!    subscriber, each in its own detached task with bounded retries.
//!
//! The engine also provides a set of events that can be subscribed to ([`mod@events`]). A simple actor framework lets
//! the order domain publish [`events::OrderEvent`]s into a bounded queue, whose handler typically hands them to the
//! webhook dispatcher.
pub mod db_types;
pub mod events;
pub mod oie_api;
pub mod traits;
pub mod webhooks;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(all(feature = "sqlite", any(feature = "test_utils", test)))]
pub mod test_utils;

pub use oie_api::{
    errors::IntegrationApiError,
    inbound_api::InboundApi,
    normalizer::NormalizationError,
    sync_api::SyncApi,
    sync_objects::{ExternalOrderRecord, RecordRejected, SyncRunResult},
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::IntegrationGatewayDatabase;
pub use webhooks::{DeliveryPolicy, DispatchHandle, WebhookDispatcher};
