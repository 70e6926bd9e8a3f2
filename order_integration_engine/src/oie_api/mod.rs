//! # Integration engine public API
//!
//! The `oie_api` module exposes the programmatic API of the integration engine.
//!
//! * [`sync_api`] runs pull syncs: fetch, normalize, dedup, create, and log. It also serves the sync history and drives
//!   the scheduled polling of due integrations.
//! * [`inbound_api`] ingests order batches pushed to us by push-type integrations, and manual bulk imports.
//!
//! Both share the normalizer in [`normalizer`] and the dedup-gated ingestion step in [`ingestion`], so a record
//! arriving by any path is treated identically.
//!
//! # API usage
//!
//! An API instance is created by supplying a storage backend plus the outbound seams it needs:
//!
//! ```rust,ignore
//! use order_integration_engine::{SqliteDatabase, SyncApi};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = SyncApi::new(db, order_source, order_creator);
//! let result = api.run_sync_for_id(IntegrationId(3)).await?;
//! println!("{} created, {} already ingested", result.created, result.updated);
//! ```
pub mod errors;
pub mod inbound_api;
pub mod ingestion;
pub mod normalizer;
pub mod sync_api;
pub mod sync_objects;
