use thiserror::Error;

use crate::db_types::{InternalOrderId, NewOrder};

#[derive(Debug, Clone, Error)]
pub enum OrderCreationError {
    #[error("The order service rejected the order with status {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("Could not reach the order service. {0}")]
    Transport(String),
    #[error("The order service returned an unexpected response. {0}")]
    InvalidResponse(String),
}

/// The order domain's creation interface.
#[allow(async_fn_in_trait)]
pub trait OrderCreator {
    async fn create_order(&self, order: &NewOrder) -> Result<InternalOrderId, OrderCreationError>;
}
