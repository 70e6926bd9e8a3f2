//! # Outbound webhooks
//!
//! [`WebhookDispatcher::notify`] fans an [`OrderEvent`](crate::events::OrderEvent) out to every active push
//! subscriber. Each subscriber gets its own detached delivery task, which signs the payload and drives a bounded retry
//! loop (see [`delivery`]). A slow or dead subscriber never holds up another one, or the caller.
//!
//! Delivery is at-least-once within the retry budget. When the budget runs out the delivery is abandoned, and only the
//! log knows about it.
pub mod delivery;
mod dispatcher;
mod payload;
mod signature;

pub use delivery::{DeliveryOutcome, DeliveryPolicy, WebhookDeliveryAttempt};
pub use dispatcher::{DispatchHandle, WebhookDispatcher};
pub use payload::{
    format_timestamp,
    WebhookPayload,
    WebhookRequest,
    EVENT_NAME_HEADER,
    EVENT_SIGNATURE_HEADER,
    EVENT_TIMESTAMP_HEADER,
};
pub use signature::{sign_payload, SignatureError};
