use thiserror::Error;

use crate::db_types::IntegrationIdentity;

#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Integration {0} has no endpoint configured")]
    MissingEndpoint(String),
    #[error("Could not build the request. {0}")]
    InvalidRequest(String),
    #[error("Request failed. {0}")]
    Transport(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Endpoint responded with status {status}. {message}")]
    Status { status: u16, message: String },
    #[error("Could not read the response body. {0}")]
    Body(String),
}

/// Fetches the raw order list from a pull integration.
#[allow(async_fn_in_trait)]
pub trait OrderSource {
    /// Sends one read request to the integration's endpoint, with its credentials attached, and returns the response
    /// body. A non-2xx response is an error. Implementations must bound the request with a timeout and must not retry.
    async fn fetch_orders(&self, integration: &IntegrationIdentity) -> Result<Vec<u8>, FetchError>;
}
