use cucumber::{gherkin::Step, given};
use order_integration_engine::{db_types::IntegrationKind, traits::FetchError};

use crate::cucumber::{integration_world::IntegrationSystem, IntegrationWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut IntegrationWorld) {
    let system = IntegrationSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "a pull integration {string} with {word} auth {string}")]
async fn pull_integration(world: &mut IntegrationWorld, name: String, auth_type: String, secret: String) {
    let system = world.system();
    let endpoint = format!("https://{name}.test/api/orders");
    let id = system
        .db
        .insert_integration(&name, IntegrationKind::Pull, Some(&endpoint), &auth_type, Some(&secret), 300, true)
        .await
        .expect("Error adding integration");
    system.integrations.insert(name, id);
}

#[given(expr = "a push integration {string}")]
async fn push_integration(world: &mut IntegrationWorld, name: String) {
    let system = world.system();
    let id = system
        .db
        .insert_integration(&name, IntegrationKind::Push, None, "none", None, 0, true)
        .await
        .expect("Error adding integration");
    system.integrations.insert(name, id);
}

#[given(expr = "{string} responds with:")]
async fn source_responds(world: &mut IntegrationWorld, #[step] step: &Step, _name: String) {
    let body = step.docstring.as_deref().expect("Step needs a docstring body");
    world.system().source.respond_with(body);
}

#[given(expr = "{string} is unreachable")]
async fn source_unreachable(world: &mut IntegrationWorld, _name: String) {
    world.system().source.fail_with(FetchError::Transport("connection refused".to_string()));
}

#[given(expr = "{string} answers with status {int}")]
async fn source_status(world: &mut IntegrationWorld, _name: String, status: u16) {
    world.system().source.fail_with(FetchError::Status { status, message: "Internal Server Error".to_string() });
}

#[given(expr = "the order service rejects client {string}")]
async fn reject_client(world: &mut IntegrationWorld, client: String) {
    world.system().creator.reject_client(&client);
}
