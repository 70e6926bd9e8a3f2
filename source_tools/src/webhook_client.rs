use std::sync::Arc;

use log::*;
use order_integration_engine::{
    traits::{DeliveryError, WebhookTransport},
    webhooks::WebhookRequest,
};
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};

use crate::{config::SourceToolsConfig, SourceToolsError};

/// Sends webhook POSTs. One call is one attempt; retries are the dispatcher's job.
#[derive(Clone)]
pub struct WebhookClient {
    client: Arc<Client>,
}

impl WebhookClient {
    pub fn new(config: &SourceToolsConfig) -> Result<Self, SourceToolsError> {
        let client = Client::builder()
            .timeout(config.webhook_timeout)
            .build()
            .map_err(|e| SourceToolsError::Initialization(e.to_string()))?;
        Ok(Self { client: Arc::new(client) })
    }

    pub fn post_request(&self, request: &WebhookRequest) -> RequestBuilder {
        let mut req = self.client.post(&request.endpoint).header(CONTENT_TYPE, "application/json");
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        req.body(request.body.clone())
    }
}

impl WebhookTransport for WebhookClient {
    async fn post(&self, request: &WebhookRequest) -> Result<u16, DeliveryError> {
        let response = self.post_request(request).send().await.map_err(|e| {
            if e.is_timeout() {
                DeliveryError::Timeout
            } else {
                DeliveryError::Transport(e.to_string())
            }
        })?;
        let status = response.status().as_u16();
        trace!("📨️ POST {} answered {status}", request.endpoint);
        Ok(status)
    }
}
