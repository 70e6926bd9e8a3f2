use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use order_integration_engine::{
    events::EventProducers,
    InboundApi,
    IntegrationGatewayDatabase,
    SqliteDatabase,
    SyncApi,
    WebhookDispatcher,
};
use source_tools::{OrderServiceApi, OrderSourceApi, WebhookClient};
use tokio::task::JoinHandle;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::webhooks::create_webhook_event_handlers,
    routes::{health, publish_order_event, ImportOrdersRoute, InboundWebhookRoute, SyncStatusRoute, TriggerSyncRoute},
    sync_worker::start_sync_worker,
};

/// How long to wait, after the HTTP server stops, for in-flight webhook deliveries to finish.
const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(120);

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Using the integration database at {}", db.url());
    let source = OrderSourceApi::new(&config.tools)?;
    let creator = OrderServiceApi::new(&config.tools)?;
    let transport = WebhookClient::new(&config.tools)?;

    let dispatcher = WebhookDispatcher::new(db.clone(), transport, config.delivery_policy);
    let handlers = create_webhook_event_handlers(dispatcher);
    let producers = handlers.producers();
    let handler_tasks = handlers.start_handlers();

    if config.sync_worker_interval.is_zero() {
        info!("🕰️ Scheduled syncs are disabled");
    } else {
        let api = SyncApi::new(db.clone(), source.clone(), creator.clone());
        let _worker = start_sync_worker(api, config.sync_worker_interval);
    }

    let srv = create_server_instance(config, db, source, creator, producers)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    // The server owned the last event producers, so the handlers are now draining their queues.
    drain_event_handlers(handler_tasks).await;
    result
}

async fn drain_event_handlers(tasks: Vec<JoinHandle<()>>) {
    info!("📨️ Waiting for in-flight webhook deliveries to finish");
    for task in tasks {
        match tokio::time::timeout(SHUTDOWN_DRAIN_TIMEOUT, task).await {
            Ok(Ok(())) => {},
            Ok(Err(e)) => warn!("📨️ An event handler did not shut down cleanly. {e}"),
            Err(_) => warn!("📨️ Gave up waiting for webhook deliveries after {}s", SHUTDOWN_DRAIN_TIMEOUT.as_secs()),
        }
    }
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    source: OrderSourceApi,
    creator: OrderServiceApi,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let sync_api = SyncApi::new(db.clone(), source.clone(), creator.clone());
        let inbound_api = InboundApi::new(db.clone(), creator.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("oig::access_log"))
            .app_data(web::Data::new(sync_api))
            .app_data(web::Data::new(inbound_api))
            .app_data(web::Data::new(producers.clone()))
            .service(health)
            .service(TriggerSyncRoute::<SqliteDatabase, OrderSourceApi, OrderServiceApi>::new())
            .service(SyncStatusRoute::<SqliteDatabase, OrderSourceApi, OrderServiceApi>::new())
            .service(InboundWebhookRoute::<SqliteDatabase, OrderServiceApi>::new())
            .service(ImportOrdersRoute::<SqliteDatabase, OrderServiceApi>::new())
            .service(publish_order_event)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
