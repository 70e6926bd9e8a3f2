use cucumber::{gherkin::Step, then, when};
use order_integration_engine::traits::{DedupLedger, IntegrationManagement, SyncLogManagement};

use crate::cucumber::IntegrationWorld;

#[when(expr = "I sync {string}")]
async fn run_sync(world: &mut IntegrationWorld, name: String) {
    let system = world.system();
    let id = system.integration_id(&name);
    let result = system.sync_api.run_sync_for_id(id).await.expect("Sync request was rejected");
    system.last_result = Some(result);
}

#[when(expr = "{string} pushes:")]
async fn push_orders(world: &mut IntegrationWorld, #[step] step: &Step, name: String) {
    let body = step.docstring.as_deref().expect("Step needs a docstring body").to_string();
    let system = world.system();
    let result = system.inbound_api.receive(&name, body.as_bytes()).await.expect("Webhook was rejected");
    system.last_result = Some(result);
}

#[then(expr = "the result shows {int} received, {int} created, {int} updated and {int} errors")]
async fn check_result(
    world: &mut IntegrationWorld,
    received: usize,
    created: usize,
    updated: usize,
    errors: usize,
) {
    let result = world.system().last_result();
    assert_eq!(
        (result.total_received, result.created, result.updated, result.errors),
        (received, created, updated, errors),
        "Unexpected result {result:?}"
    );
}

#[then(expr = "an error mentions {string}")]
async fn check_error_detail(world: &mut IntegrationWorld, fragment: String) {
    let result = world.system().last_result();
    assert!(
        result.error_details.iter().any(|e| e.contains(&fragment)),
        "No error mentions '{fragment}': {:?}",
        result.error_details
    );
}

#[then(expr = "the ledger maps {string} order {string} to an internal order")]
async fn check_mapping(world: &mut IntegrationWorld, name: String, external_id: String) {
    let system = world.system();
    let id = system.integration_id(&name);
    let mapping = system.db.lookup_mapping(id, &external_id).await.expect("Error reading ledger");
    assert!(mapping.is_some(), "No mapping for {name}/{external_id}");
}

#[then(expr = "the ledger has no entry for {string} order {string}")]
async fn check_no_mapping(world: &mut IntegrationWorld, name: String, external_id: String) {
    let system = world.system();
    let id = system.integration_id(&name);
    let mapping = system.db.lookup_mapping(id, &external_id).await.expect("Error reading ledger");
    assert!(mapping.is_none(), "Unexpected mapping for {name}/{external_id}");
}

#[then(expr = "the order service has created {int} orders")]
async fn check_created_orders(world: &mut IntegrationWorld, count: usize) {
    assert_eq!(world.system().creator.count(), count);
}

#[then(expr = "the sync history for {string} has {int} entries")]
async fn check_history(world: &mut IntegrationWorld, name: String, count: usize) {
    let system = world.system();
    let id = system.integration_id(&name);
    let logs = system.db.fetch_sync_logs(id, 100).await.expect("Error reading sync logs");
    assert_eq!(logs.len(), count);
}

#[then(expr = "{string} has been marked as synced")]
async fn check_synced(world: &mut IntegrationWorld, name: String) {
    let system = world.system();
    let id = system.integration_id(&name);
    let integration = system.db.fetch_integration(id).await.expect("Error reading integration").unwrap();
    assert!(integration.last_sync.is_some(), "{name} has no last_sync");
}

#[then(expr = "{string} has never been synced")]
async fn check_not_synced(world: &mut IntegrationWorld, name: String) {
    let system = world.system();
    let id = system.integration_id(&name);
    let integration = system.db.fetch_integration(id).await.expect("Error reading integration").unwrap();
    assert!(integration.last_sync.is_none(), "{name} was marked as synced");
}
