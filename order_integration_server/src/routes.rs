//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here talks to the database or to an external system,
//! so they are all async, and any long-running work (such as webhook delivery) is handed off to a background task.
use actix_web::{get, post, web, HttpResponse, Responder};
use log::*;
use order_integration_engine::{
    db_types::IntegrationId,
    events::{EventProducers, OrderEvent},
    traits::{OrderCreator, OrderSource},
    InboundApi,
    IntegrationGatewayDatabase,
    SyncApi,
};

use crate::{
    data_objects::{JsonResponse, SyncResponse, SyncStatusResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Sync  ----------------------------------------------------
route!(trigger_sync => Post "/sync/{id}" impl IntegrationGatewayDatabase, OrderSource, OrderCreator);
/// Runs a sync against the pull integration with the given id, right now.
///
/// The response is the run's summary. A sync whose fetch failed still answers `200 OK`; the failure is reported in
/// the summary's `errors` and `error_details` fields. Unknown or inactive integrations give a 404, and push
/// integrations give a 400.
pub async fn trigger_sync<B, S, O>(
    path: web::Path<i64>,
    api: web::Data<SyncApi<B, S, O>>,
) -> Result<HttpResponse, ServerError>
where
    B: IntegrationGatewayDatabase,
    S: OrderSource,
    O: OrderCreator,
{
    let integration_id = IntegrationId(path.into_inner());
    debug!("💻️ Manual sync requested for integration {integration_id}");
    let result = api.run_sync_for_id(integration_id).await?;
    Ok(HttpResponse::Ok().json(SyncResponse { integration_id, result }))
}

route!(sync_status => Get "/sync/status/{id}" impl IntegrationGatewayDatabase, OrderSource, OrderCreator);
pub async fn sync_status<B, S, O>(
    path: web::Path<i64>,
    api: web::Data<SyncApi<B, S, O>>,
) -> Result<HttpResponse, ServerError>
where
    B: IntegrationGatewayDatabase,
    S: OrderSource,
    O: OrderCreator,
{
    let integration_id = IntegrationId(path.into_inner());
    trace!("💻️ Fetching sync history for integration {integration_id}");
    let history = api.sync_history(integration_id).await?;
    Ok(HttpResponse::Ok().json(SyncStatusResponse { integration_id, history }))
}

//----------------------------------------------   Inbound  ----------------------------------------------------
route!(inbound_webhook => Post "/webhook/{integration_name}" impl IntegrationGatewayDatabase, OrderCreator);
/// Receives orders pushed by the named push integration. The body is either a JSON array of orders, or a single
/// order object.
pub async fn inbound_webhook<B, O>(
    path: web::Path<String>,
    body: web::Bytes,
    api: web::Data<InboundApi<B, O>>,
) -> Result<HttpResponse, ServerError>
where
    B: IntegrationGatewayDatabase,
    O: OrderCreator,
{
    let name = path.into_inner();
    debug!("💻️ Received {} bytes of orders from '{name}'", body.len());
    let result = api.receive(&name, &body).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(import_orders => Post "/import/orders" impl IntegrationGatewayDatabase, OrderCreator);
pub async fn import_orders<B, O>(body: web::Bytes, api: web::Data<InboundApi<B, O>>) -> Result<HttpResponse, ServerError>
where
    B: IntegrationGatewayDatabase,
    O: OrderCreator,
{
    debug!("💻️ Received a bulk import of {} bytes", body.len());
    let result = api.import_orders(&body).await?;
    Ok(HttpResponse::Ok().json(SyncResponse { integration_id: IntegrationId::MANUAL_IMPORT, result }))
}

//----------------------------------------------   Events  ----------------------------------------------------
/// Queues an order event for delivery to the webhook subscribers, and answers `202 Accepted` without waiting for
/// any delivery.
#[post("/events/orders")]
pub async fn publish_order_event(
    body: web::Json<OrderEvent>,
    producers: web::Data<EventProducers>,
) -> Result<HttpResponse, ServerError> {
    let event = body.into_inner();
    debug!("💻️ Received {} event for order {}", event.event, event.order_id);
    if !producers.try_publish_order_event(event) {
        return Err(ServerError::EventQueueFull);
    }
    Ok(HttpResponse::Accepted().json(JsonResponse::success("Event queued for delivery")))
}
