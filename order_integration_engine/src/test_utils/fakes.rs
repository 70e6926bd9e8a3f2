//! In-memory stand-ins for the outbound seams.
use std::sync::{Arc, Mutex};

use crate::{
    db_types::{IntegrationIdentity, InternalOrderId, NewOrder},
    traits::{FetchError, OrderCreationError, OrderCreator, OrderSource},
};

/// Serves a fixed response to every fetch and remembers who asked.
#[derive(Debug, Clone)]
pub struct StaticOrderSource {
    response: Arc<Mutex<Result<Vec<u8>, FetchError>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl StaticOrderSource {
    pub fn new(body: &str) -> Self {
        Self { response: Arc::new(Mutex::new(Ok(body.as_bytes().to_vec()))), fetched: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn failing(err: FetchError) -> Self {
        let source = Self::new("");
        source.fail_with(err);
        source
    }

    pub fn respond_with(&self, body: &str) {
        *self.response.lock().unwrap() = Ok(body.as_bytes().to_vec());
    }

    pub fn fail_with(&self, err: FetchError) {
        *self.response.lock().unwrap() = Err(err);
    }

    /// Names of the integrations fetched so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl OrderSource for StaticOrderSource {
    async fn fetch_orders(&self, integration: &IntegrationIdentity) -> Result<Vec<u8>, FetchError> {
        self.fetched.lock().unwrap().push(integration.name.clone());
        self.response.lock().unwrap().clone()
    }
}

/// Hands out sequential order ids, starting at 1000, and keeps every order it accepted.
///
/// Orders whose client name is in the reject list are refused with a 422.
#[derive(Debug, Clone, Default)]
pub struct CountingOrderCreator {
    created: Arc<Mutex<Vec<NewOrder>>>,
    reject: Arc<Mutex<Vec<String>>>,
}

impl CountingOrderCreator {
    pub fn reject_client(&self, client_name: &str) {
        self.reject.lock().unwrap().push(client_name.to_string());
    }

    pub fn created(&self) -> Vec<NewOrder> {
        self.created.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.created.lock().unwrap().len()
    }
}

impl OrderCreator for CountingOrderCreator {
    async fn create_order(&self, order: &NewOrder) -> Result<InternalOrderId, OrderCreationError> {
        if self.reject.lock().unwrap().contains(&order.client_name) {
            return Err(OrderCreationError::Rejected {
                status: 422,
                message: format!("Client {} is not allowed", order.client_name),
            });
        }
        let mut created = self.created.lock().unwrap();
        created.push(order.clone());
        Ok(InternalOrderId(999 + created.len() as i64))
    }
}
