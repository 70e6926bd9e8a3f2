use std::sync::Arc;

use log::*;
use order_integration_engine::{
    db_types::{InternalOrderId, NewOrder},
    traits::{OrderCreationError, OrderCreator},
};
use reqwest::Client;
use serde::Deserialize;

use crate::{config::SourceToolsConfig, SourceToolsError};

/// Client for the order service's creation endpoint.
#[derive(Clone)]
pub struct OrderServiceApi {
    base_url: String,
    client: Arc<Client>,
}

#[derive(Deserialize)]
struct CreatedOrder {
    id: i64,
}

impl OrderServiceApi {
    pub fn new(config: &SourceToolsConfig) -> Result<Self, SourceToolsError> {
        if config.order_service_url.trim().is_empty() {
            return Err(SourceToolsError::InvalidConfiguration("The order service URL is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| SourceToolsError::Initialization(e.to_string()))?;
        let base_url = config.order_service_url.trim_end_matches('/').to_string();
        Ok(Self { base_url, client: Arc::new(client) })
    }

    pub fn url(&self) -> String {
        format!("{}/orders", self.base_url)
    }
}

impl OrderCreator for OrderServiceApi {
    async fn create_order(&self, order: &NewOrder) -> Result<InternalOrderId, OrderCreationError> {
        let response = self
            .client
            .post(self.url())
            .json(order)
            .send()
            .await
            .map_err(|e| OrderCreationError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderCreationError::Rejected { status: status.as_u16(), message });
        }
        let created =
            response.json::<CreatedOrder>().await.map_err(|e| OrderCreationError::InvalidResponse(e.to_string()))?;
        trace!("🔄️ Order service created order {} for {}", created.id, order.client_name);
        Ok(InternalOrderId(created.id))
    }
}
