use mockall::mock;
use order_integration_engine::{
    db_types::{IntegrationIdentity, InternalOrderId, NewOrder},
    traits::{FetchError, OrderCreationError, OrderCreator, OrderSource},
};

mock! {
    pub Fetcher {}
    impl OrderSource for Fetcher {
        async fn fetch_orders(&self, integration: &IntegrationIdentity) -> Result<Vec<u8>, FetchError>;
    }
}

mock! {
    pub OrderService {}
    impl OrderCreator for OrderService {
        async fn create_order(&self, order: &NewOrder) -> Result<InternalOrderId, OrderCreationError>;
    }
}
