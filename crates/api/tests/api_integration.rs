//! Integration tests for the REST API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use api::observer::{OperationObserver, PrometheusObserver};
use auth::{JwtConfig, JwtService};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use store::InMemoryStore;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

/// Counts observer notifications so tests can check when they fire.
#[derive(Default)]
struct RecordingObserver {
    pvz: AtomicUsize,
    receptions: AtomicUsize,
    products: AtomicUsize,
}

impl OperationObserver for RecordingObserver {
    fn pvz_created(&self) {
        self.pvz.fetch_add(1, Ordering::SeqCst);
    }

    fn reception_created(&self) {
        self.receptions.fetch_add(1, Ordering::SeqCst);
    }

    fn product_added(&self) {
        self.products.fetch_add(1, Ordering::SeqCst);
    }
}

fn jwt() -> JwtService {
    JwtService::new(&JwtConfig::new("integration-secret"))
}

fn setup() -> Router {
    setup_with_observer().0
}

fn setup_with_observer() -> (Router, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::default());
    let state = api::create_state(InMemoryStore::new(), jwt(), observer.clone());
    (api::create_app(state), observer)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_empty(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn token_for(app: &Router, role: &str) -> String {
    let (status, body) = send(app, post_json("/dummyLogin", None, json!({ "role": role }))).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create_pvz(app: &Router, id: &str) {
    let moderator = token_for(app, "moderator").await;
    let (status, _) = send(
        app,
        post_json("/pvz", Some(&moderator), json!({ "id": id, "city": "Москва" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_dummy_login() {
    let app = setup();

    let token = token_for(&app, "employee").await;
    let claims = jwt().validate(&token).unwrap();
    assert_eq!(claims.sub, "dummy_employee");

    let (status, body) = send(&app, post_json("/dummyLogin", None, json!({ "role": "admin" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = setup();

    let (status, body) = send(&app, post_json("/pvz", None, json!({ "city": "Москва" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "no auth token provided");
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = setup();

    let request = Request::builder()
        .uri("/pvz")
        .header("authorization", "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "wrong token format");
}

#[tokio::test]
async fn test_token_from_another_secret_is_rejected() {
    let app = setup();
    let foreign = JwtService::new(&JwtConfig::new("other-secret"))
        .issue("intruder", common::Role::Moderator)
        .unwrap();

    let (status, body) = send(&app, get_with_token("/pvz", &foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid or expired token");
}

#[tokio::test]
async fn test_employee_cannot_create_pvz() {
    let (app, observer) = setup_with_observer();
    let employee = token_for(&app, "employee").await;

    let (status, body) = send(
        &app,
        post_json("/pvz", Some(&employee), json!({ "city": "Москва" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "only moderators can do that");
    assert_eq!(observer.pvz.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_create_pvz() {
    let (app, observer) = setup_with_observer();
    let moderator = token_for(&app, "moderator").await;

    let (status, body) = send(
        &app,
        post_json(
            "/pvz",
            Some(&moderator),
            json!({
                "id": "p1",
                "registrationDate": "2025-04-01T10:00:00Z",
                "city": "Казань"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "p1");
    assert_eq!(body["city"], "Казань");
    assert_eq!(body["registrationDate"], "2025-04-01T10:00:00Z");
    assert_eq!(observer.pvz.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_create_pvz_defaults_id_and_date() {
    let app = setup();
    let moderator = token_for(&app, "moderator").await;

    let (status, body) = send(
        &app,
        post_json("/pvz", Some(&moderator), json!({ "city": "Москва" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert!(body["registrationDate"].is_string());
}

#[tokio::test]
async fn test_create_pvz_invalid_city() {
    let (app, observer) = setup_with_observer();
    let moderator = token_for(&app, "moderator").await;

    let (status, body) = send(
        &app,
        post_json("/pvz", Some(&moderator), json!({ "city": "Новосибирск" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid city");
    assert_eq!(observer.pvz.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup();
    let moderator = token_for(&app, "moderator").await;

    let request = Request::builder()
        .method("POST")
        .uri("/pvz")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {moderator}"))
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_reception_and_product_flow() {
    let (app, observer) = setup_with_observer();
    create_pvz(&app, "p1").await;
    let employee = token_for(&app, "employee").await;

    let (status, reception) = send(
        &app,
        post_json("/receptions", Some(&employee), json!({ "pvzId": "p1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reception["status"], "in_progress");
    assert_eq!(reception["pvzId"], "p1");

    let (status, body) = send(
        &app,
        post_json("/receptions", Some(&employee), json!({ "pvzId": "p1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "there is already an open reception");

    for _ in 0..2 {
        let (status, product) = send(
            &app,
            post_json(
                "/products",
                Some(&employee),
                json!({ "type": "обувь", "pvzId": "p1" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product["type"], "обувь");
        assert_eq!(product["receptionId"], reception["id"]);
    }

    let (status, _) = send(&app, post_empty("/pvz/p1/delete_last_product", &employee)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, closed) = send(&app, post_empty("/pvz/p1/close_last_reception", &employee)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["id"], reception["id"]);
    assert_eq!(closed["status"], "closed");

    let (status, body) = send(
        &app,
        post_json(
            "/products",
            Some(&employee),
            json!({ "type": "обувь", "pvzId": "p1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no open reception to add product");

    assert_eq!(observer.receptions.load(Ordering::SeqCst), 1);
    assert_eq!(observer.products.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_open_reception_unknown_pvz() {
    let app = setup();
    let employee = token_for(&app, "employee").await;

    let (status, body) = send(
        &app,
        post_json("/receptions", Some(&employee), json!({ "pvzId": "missing" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_invalid_product_type() {
    let app = setup();
    create_pvz(&app, "p1").await;
    let employee = token_for(&app, "employee").await;
    send(
        &app,
        post_json("/receptions", Some(&employee), json!({ "pvzId": "p1" })),
    )
    .await;

    let (status, _) = send(
        &app,
        post_json(
            "/products",
            Some(&employee),
            json!({ "type": "мебель", "pvzId": "p1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_pvz_shape() {
    let app = setup();
    create_pvz(&app, "p1").await;
    create_pvz(&app, "p2").await;
    let employee = token_for(&app, "employee").await;
    send(
        &app,
        post_json("/receptions", Some(&employee), json!({ "pvzId": "p1" })),
    )
    .await;
    send(
        &app,
        post_json(
            "/products",
            Some(&employee),
            json!({ "type": "одежда", "pvzId": "p1" }),
        ),
    )
    .await;

    let (status, body) = send(&app, get_with_token("/pvz?page=1&limit=10", &employee)).await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["pvz"]["id"], "p1");
    let receptions = items[0]["receptions"].as_array().unwrap();
    assert_eq!(receptions.len(), 1);
    assert_eq!(receptions[0]["reception"]["status"], "in_progress");
    assert_eq!(receptions[0]["products"][0]["type"], "одежда");
    assert!(items[1]["receptions"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, get_with_token("/pvz?page=2&limit=1", &employee)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["pvz"]["id"], "p2");
}

#[tokio::test]
async fn test_list_pvz_date_filter() {
    let app = setup();
    create_pvz(&app, "p1").await;
    let employee = token_for(&app, "employee").await;
    send(
        &app,
        post_json("/receptions", Some(&employee), json!({ "pvzId": "p1" })),
    )
    .await;

    let (status, body) = send(
        &app,
        get_with_token("/pvz?endDate=2000-01-01T00:00:00Z", &employee),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body[0]["receptions"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, get_with_token("/pvz?startDate=yesterday", &employee)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid startDate");
}

#[tokio::test]
async fn test_register_and_login() {
    let app = setup();

    let (status, user) = send(
        &app,
        post_json(
            "/register",
            None,
            json!({ "email": "e@example.com", "password": "secret", "role": "employee" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "e@example.com");
    assert_eq!(user["role"], "employee");
    assert!(user.get("password").is_none());

    let (status, body) = send(
        &app,
        post_json(
            "/login",
            None,
            json!({ "email": "e@example.com", "password": "secret" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let claims = jwt().validate(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, user["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        post_json(
            "/login",
            None,
            json!({ "email": "e@example.com", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json(
            "/login",
            None,
            json!({ "email": "nobody@example.com", "password": "secret" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let store = InMemoryStore::new();
    let state = api::create_state(
        store.clone(),
        jwt(),
        Arc::new(RecordingObserver::default()),
    );
    let app = api::create_app(state);
    let moderator = token_for(&app, "moderator").await;
    store.set_unavailable(true);

    let (status, _) = send(
        &app,
        post_json("/pvz", Some(&moderator), json!({ "city": "Москва" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let handle = get_metrics_handle();
    let state = api::create_state(InMemoryStore::new(), jwt(), Arc::new(PrometheusObserver));
    let app = api::create_app(state);
    create_pvz(&app, "p1").await;

    let metrics_app = api::create_metrics_app(handle);
    let response = metrics_app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("pvz_created_total"));
}
