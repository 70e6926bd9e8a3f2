use actix_web::{http::StatusCode, web, web::ServiceConfig};
use order_integration_engine::{
    db_types::{IntegrationId, InternalOrderId, NewOrder},
    traits::{DedupLedger, OrderCreationError},
    InboundApi,
    SqliteDatabase,
};
use serde_json::Value;

use super::{
    helpers::{add_push_integration, post_request, test_db},
    mocks::MockOrderService,
};
use crate::routes::{ImportOrdersRoute, InboundWebhookRoute};

fn configure(api: InboundApi<SqliteDatabase, MockOrderService>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(api))
            .service(InboundWebhookRoute::<SqliteDatabase, MockOrderService>::new())
            .service(ImportOrdersRoute::<SqliteDatabase, MockOrderService>::new());
    }
}

#[actix_web::test]
async fn single_pushed_order_is_created() {
    let db = test_db().await;
    let id = add_push_integration(&db, "courier").await;
    let mut creator = MockOrderService::new();
    creator
        .expect_create_order()
        .withf(|order: &NewOrder| order.client_name == "Eva" && order.client_email.is_none())
        .times(1)
        .returning(|_| Ok(InternalOrderId(7)));
    let api = InboundApi::new(db.clone(), creator);

    let order = r#"{"external_id": "C-1", "client_name": "Eva", "client_email": "  ", "address": "9 Dock Rd"}"#;
    let (status, body) = post_request("/webhook/courier", order, configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["total_received"], 1);
    assert_eq!(result["created"], 1);

    let mapping = db.lookup_mapping(id, "C-1").await.unwrap();
    assert_eq!(mapping, Some(InternalOrderId(7)));
}

#[actix_web::test]
async fn rejected_orders_are_counted_and_the_batch_carries_on() {
    let db = test_db().await;
    add_push_integration(&db, "courier").await;
    let mut creator = MockOrderService::new();
    creator
        .expect_create_order()
        .withf(|order: &NewOrder| order.client_name == "Bad")
        .times(1)
        .returning(|_| Err(OrderCreationError::Rejected { status: 422, message: "no address".into() }));
    creator
        .expect_create_order()
        .withf(|order: &NewOrder| order.client_name == "Good")
        .times(1)
        .returning(|_| Ok(InternalOrderId(8)));
    let api = InboundApi::new(db, creator);

    let orders = r#"[
        {"external_id": "C-1", "client_name": "Bad"},
        {"external_id": "C-2", "client_name": "Good", "address": "1 Main St"}
    ]"#;
    let (status, body) = post_request("/webhook/courier", orders, configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["total_received"], 2);
    assert_eq!(result["created"], 1);
    assert_eq!(result["errors"], 1);
    assert!(result["error_details"][0].as_str().unwrap().contains("C-1"));
}

#[actix_web::test]
async fn unknown_push_integration_is_not_found() {
    let db = test_db().await;
    let mut creator = MockOrderService::new();
    creator.expect_create_order().times(0);
    let api = InboundApi::new(db, creator);

    let (status, _) = post_request("/webhook/nobody", "[]", configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unparseable_body_is_a_bad_request() {
    let db = test_db().await;
    add_push_integration(&db, "courier").await;
    let mut creator = MockOrderService::new();
    creator.expect_create_order().times(0);
    let api = InboundApi::new(db, creator);

    let (status, body) = post_request("/webhook/courier", "orders, please", configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"#));
}

#[actix_web::test]
async fn bulk_import_uses_the_manual_import_integration() {
    let db = test_db().await;
    let mut creator = MockOrderService::new();
    creator.expect_create_order().times(1).returning(|_| Ok(InternalOrderId(50)));
    let api = InboundApi::new(db.clone(), creator);

    let orders = r#"[{"external_id": "legacy-9", "client_name": "Iris", "address": "3 Elm St"}]"#;
    let (status, body) = post_request("/import/orders", orders, configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["integration_id"], 0);
    assert_eq!(result["created"], 1);

    let mapping = db.lookup_mapping(IntegrationId::MANUAL_IMPORT, "legacy-9").await.unwrap();
    assert_eq!(mapping, Some(InternalOrderId(50)));
}
