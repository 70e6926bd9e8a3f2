use std::sync::atomic::{AtomicI64, Ordering};

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use order_integration_engine::{
    db_types::{IntegrationId, InternalOrderId},
    traits::{FetchError, IntegrationManagement},
    SqliteDatabase,
    SyncApi,
};
use serde_json::Value;

use super::{
    helpers::{add_pull_integration, add_push_integration, get_request, post_request, test_db},
    mocks::{MockFetcher, MockOrderService},
};
use crate::routes::{SyncStatusRoute, TriggerSyncRoute};

type TestSyncApi = SyncApi<SqliteDatabase, MockFetcher, MockOrderService>;

const TWO_ORDERS: &str = r#"{"data": [
    {"external_id": "A1", "client_name": "Ana", "address": "1 High St"},
    {"external_id": 2, "client_name": "Ben", "address": "2 High St", "branch": "north"}
]}"#;

fn configure(api: TestSyncApi) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(api))
            .service(TriggerSyncRoute::<SqliteDatabase, MockFetcher, MockOrderService>::new())
            .service(SyncStatusRoute::<SqliteDatabase, MockFetcher, MockOrderService>::new());
    }
}

fn numbered_order_service(expected: usize) -> MockOrderService {
    let next_id = AtomicI64::new(100);
    let mut creator = MockOrderService::new();
    creator
        .expect_create_order()
        .times(expected)
        .returning(move |_| Ok(InternalOrderId(next_id.fetch_add(1, Ordering::SeqCst))));
    creator
}

#[actix_web::test]
async fn manual_sync_creates_new_orders() {
    let db = test_db().await;
    let id = add_pull_integration(&db, "acme").await;
    let mut source = MockFetcher::new();
    source.expect_fetch_orders().times(1).returning(|_| Ok(TWO_ORDERS.as_bytes().to_vec()));
    let api = SyncApi::new(db.clone(), source, numbered_order_service(2));

    let (status, body) = post_request(&format!("/sync/{}", id.value()), "", configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["integration_id"], id.value());
    assert_eq!(result["total_received"], 2);
    assert_eq!(result["created"], 2);
    assert_eq!(result["updated"], 0);
    assert_eq!(result["errors"], 0);
    assert!(result.get("error_details").is_none());

    let integration = db.fetch_integration(id).await.unwrap().unwrap();
    assert!(integration.last_sync.is_some());
}

#[actix_web::test]
async fn failed_fetch_is_reported_in_the_result() {
    let db = test_db().await;
    let id = add_pull_integration(&db, "acme").await;
    let mut source = MockFetcher::new();
    source
        .expect_fetch_orders()
        .times(1)
        .returning(|_| Err(FetchError::Status { status: 503, message: "down".into() }));
    let api = SyncApi::new(db.clone(), source, numbered_order_service(0));

    let (status, body) = post_request(&format!("/sync/{}", id.value()), "", configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["total_received"], 0);
    assert_eq!(result["created"], 0);
    assert_eq!(result["errors"], 1);
    assert!(result["error_details"][0].as_str().unwrap().contains("503"));

    let integration = db.fetch_integration(id).await.unwrap().unwrap();
    assert!(integration.last_sync.is_none());
}

#[actix_web::test]
async fn unknown_integration_is_not_found() {
    let db = test_db().await;
    let mut source = MockFetcher::new();
    source.expect_fetch_orders().times(0);
    let api = SyncApi::new(db, source, numbered_order_service(0));

    let (status, body) = post_request("/sync/99", "", configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert!(err["error"].as_str().unwrap().contains("does not exist or is not active"));
}

#[actix_web::test]
async fn push_integrations_cannot_be_synced() {
    let db = test_db().await;
    let id = add_push_integration(&db, "marketplace").await;
    let mut source = MockFetcher::new();
    source.expect_fetch_orders().times(0);
    let api = SyncApi::new(db, source, numbered_order_service(0));

    let (status, _) = post_request(&format!("/sync/{}", id.value()), "", configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn repeated_syncs_show_up_in_the_history() {
    let db = test_db().await;
    let id = add_pull_integration(&db, "acme").await;
    let mut source = MockFetcher::new();
    source.expect_fetch_orders().times(2).returning(|_| Ok(TWO_ORDERS.as_bytes().to_vec()));
    let api = SyncApi::new(db, source, numbered_order_service(2));
    let first = api.run_sync_for_id(id).await.unwrap();
    assert_eq!(first.created, 2);
    let second = api.run_sync_for_id(id).await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);

    let (status, body) = get_request(&format!("/sync/status/{}", id.value()), configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let status: Value = serde_json::from_str(&body).unwrap();
    let history = status["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    // Newest first
    assert_eq!(history[0]["updated"], 2);
    assert_eq!(history[1]["created"], 2);
    assert!(history.iter().all(|entry| entry["trigger"] == "sync"));
}

#[actix_web::test]
async fn history_of_an_unsynced_integration_is_empty() {
    let db = test_db().await;
    let api = SyncApi::new(db, MockFetcher::new(), MockOrderService::new());
    let path = format!("/sync/status/{}", IntegrationId(5).value());
    let (status, body) = get_request(&path, configure(api)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"integration_id":5,"history":[]}"#);
}
