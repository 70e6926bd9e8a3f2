use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use log::debug;
use order_integration_engine::{
    db_types::{IntegrationId, IntegrationKind},
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    SqliteDatabase,
};

/// A migrated database in a fresh temporary file.
pub async fn test_db() -> SqliteDatabase {
    prepare_test_env(&random_db_path()).await
}

pub async fn add_pull_integration(db: &SqliteDatabase, name: &str) -> IntegrationId {
    let endpoint = Some("http://orders.test/api");
    db.insert_integration(name, IntegrationKind::Pull, endpoint, "bearer", Some("t0ken"), 300, true)
        .await
        .expect("Failed to insert pull integration")
}

pub async fn add_push_integration(db: &SqliteDatabase, name: &str) -> IntegrationId {
    db.insert_integration(name, IntegrationKind::Push, None, "none", None, 0, true)
        .await
        .expect("Failed to insert push integration")
}

pub async fn get_request<F>(path: &str, configure: F) -> Result<(StatusCode, String), String>
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::get().uri(path);
    make_request(req, configure).await
}

pub async fn post_request<F>(path: &str, body: &str, configure: F) -> Result<(StatusCode, String), String>
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post()
        .uri(path)
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string());
    make_request(req, configure).await
}

async fn make_request<F>(req: TestRequest, configure: F) -> Result<(StatusCode, String), String>
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req.to_request()).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
