use std::sync::Arc;

use log::*;
use order_integration_engine::{
    db_types::IntegrationIdentity,
    traits::{FetchError, OrderSource},
};
use reqwest::{header::ACCEPT, Client, RequestBuilder};

use crate::{auth::auth_header, config::SourceToolsConfig, SourceToolsError};

/// Fetches order lists from pull integrations.
#[derive(Clone)]
pub struct OrderSourceApi {
    client: Arc<Client>,
}

impl OrderSourceApi {
    pub fn new(config: &SourceToolsConfig) -> Result<Self, SourceToolsError> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| SourceToolsError::Initialization(e.to_string()))?;
        Ok(Self { client: Arc::new(client) })
    }

    /// The GET request for the integration's endpoint, with its credential attached.
    pub fn fetch_request(&self, integration: &IntegrationIdentity) -> Result<RequestBuilder, FetchError> {
        let endpoint =
            integration.endpoint.as_deref().ok_or_else(|| FetchError::MissingEndpoint(integration.name.clone()))?;
        let url = reqwest::Url::parse(endpoint).map_err(|e| FetchError::InvalidRequest(format!("{endpoint}: {e}")))?;
        let mut req = self.client.get(url).header(ACCEPT, "application/json");
        if let Some((name, value)) = auth_header(&integration.auth) {
            req = req.header(name, value);
        }
        Ok(req)
    }
}

impl OrderSource for OrderSourceApi {
    async fn fetch_orders(&self, integration: &IntegrationIdentity) -> Result<Vec<u8>, FetchError> {
        let req = self.fetch_request(integration)?;
        trace!("🔄️ Fetching orders for {} with {} auth", integration.name, integration.auth.scheme());
        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status: status.as_u16(), message });
        }
        let body = response.bytes().await.map_err(|e| FetchError::Body(e.to_string()))?;
        debug!("🔄️ Fetched {} bytes from {}", body.len(), integration.name);
        Ok(body.to_vec())
    }
}
