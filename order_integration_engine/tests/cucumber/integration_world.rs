use std::collections::HashMap;

use cucumber::World;
use log::*;
use order_integration_engine::{
    db_types::IntegrationId,
    test_utils::{
        fakes::{CountingOrderCreator, StaticOrderSource},
        prepare_env::{prepare_test_env, random_db_path},
    },
    InboundApi,
    SqliteDatabase,
    SyncApi,
    SyncRunResult,
};

#[derive(Default, Debug, World)]
pub struct IntegrationWorld {
    pub system: Option<IntegrationSystem>,
}

#[derive(Debug)]
pub struct IntegrationSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub source: StaticOrderSource,
    pub creator: CountingOrderCreator,
    pub sync_api: SyncApi<SqliteDatabase, StaticOrderSource, CountingOrderCreator>,
    pub inbound_api: InboundApi<SqliteDatabase, CountingOrderCreator>,
    pub integrations: HashMap<String, IntegrationId>,
    pub last_result: Option<SyncRunResult>,
}

impl IntegrationWorld {
    pub fn system(&mut self) -> &mut IntegrationSystem {
        self.system.as_mut().expect("System not initialised. Start the scenario with 'Given a fresh install'")
    }
}

impl IntegrationSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        debug!("Created database: {url}");
        let source = StaticOrderSource::new("[]");
        let creator = CountingOrderCreator::default();
        let sync_api = SyncApi::new(db.clone(), source.clone(), creator.clone());
        let inbound_api = InboundApi::new(db.clone(), creator.clone());
        Self {
            db_path: url,
            db,
            source,
            creator,
            sync_api,
            inbound_api,
            integrations: HashMap::new(),
            last_result: None,
        }
    }

    pub fn integration_id(&self, name: &str) -> IntegrationId {
        *self.integrations.get(name).unwrap_or_else(|| panic!("Integration {name} has not been configured"))
    }

    pub fn last_result(&self) -> &SyncRunResult {
        self.last_result.as_ref().expect("Nothing has been synced yet")
    }
}
