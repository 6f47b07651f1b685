//! Common test utilities for integration tests.
//!
//! Boots a fake backend with axum on an ephemeral port. It serves canned
//! responses shaped like the real backend's (envelopes, mixed casing,
//! numeric ids) plus a few deliberately broken ones.

// Not every test file uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use mfg_dash_api::client::ApiClient;
use mfg_dash_api::config::Config;
use mfg_dash_api::session::Session;
use persistence::AppState;
use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TOKEN: &str = "tok-123";
pub const PASSWORD: &str = "secret-pw";
pub const LOGIN_FAILED: &str = "아이디 또는 비밀번호가 올바르지 않습니다.";
pub const MACHINES_FAILED: &str = "설비 정보를 불러올 수 없습니다.";
pub const ATTACHMENT: &[u8] = b"%PDF-1.4 fake attachment";

/// What the fake backend saw, for assertions.
#[derive(Debug, Default)]
pub struct Recorded {
    pub request_ids: Vec<String>,
    pub keywords: Vec<String>,
    pub upload_fields: Vec<(String, Option<String>)>,
    pub bodies: Vec<Value>,
}

pub type Shared = Arc<Mutex<Recorded>>;

pub struct TestBackend {
    pub addr: SocketAddr,
    pub recorded: Shared,
}

impl TestBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap()
    }
}

/// Starts the fake backend on `127.0.0.1:0`.
pub async fn spawn_backend() -> TestBackend {
    let recorded: Shared = Arc::default();
    let app = router(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend { addr, recorded }
}

/// Configuration pointing at the fake backend.
pub fn test_config(backend: &TestBackend) -> Config {
    let url = backend.url();
    Config::load_for_test(&[("api.base_url", url.as_str()), ("api.timeout_secs", "5")])
        .expect("Failed to build test config")
}

pub fn test_client(backend: &TestBackend) -> ApiClient {
    ApiClient::new(&test_config(backend).api).expect("Failed to build client")
}

/// A session over stores in a fresh temporary directory.
pub fn test_session(backend: &TestBackend) -> (Session, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::open_dir(dir.path()).unwrap();
    (Session::new(test_client(backend), state), dir)
}

fn router(recorded: Shared) -> Router {
    Router::new()
        .route("/api/member/login", post(login))
        .route("/api/notice", get(list_notices))
        .route("/api/notice/:id", get(get_notice))
        .route("/api/notice/:id/pin", put(pin_notice))
        .route("/api/notice/:id/attachment", get(attachment))
        .route("/api/community", get(|| async { "<html>maintenance</html>" }))
        .route("/api/community/:id/comment-count", get(|| async { Json(json!({"count": 3})) }))
        .route("/api/comment/:community_id", post(create_comment))
        .route("/api/operation/product", get(list_products))
        .route("/api/operation/machine", get(list_machines))
        .route("/api/operation/machine/xls", post(upload_workbook))
        .route("/api/scenarios", get(|| async { Json(json!([])) }))
        .route("/api/simulation/:id/json", get(schedule))
        .route("/api/simulation/:id/summary", get(summary))
        .route("/api/dashboard/search", get(search))
        .with_state(recorded)
}

fn record_request(recorded: &Shared, headers: &HeaderMap) {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        recorded.lock().unwrap().request_ids.push(id.to_string());
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    // No JSON body: the client must fall back to its own message.
    (StatusCode::UNAUTHORIZED, "").into_response()
}

async fn login(State(recorded): State<Shared>, Json(body): Json<Value>) -> Response {
    recorded.lock().unwrap().bodies.push(body.clone());

    if body["password"] != PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": LOGIN_FAILED}))).into_response();
    }

    Json(json!({
        "data": {
            "accessToken": TOKEN,
            "member": {"memberId": 7, "memberName": "김계획", "role": "ROLE_PLANNER"}
        }
    }))
    .into_response()
}

#[derive(Deserialize)]
struct Search {
    keyword: Option<String>,
}

async fn list_notices(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<Search>,
) -> Response {
    record_request(&recorded, &headers);
    if !authorized(&headers) {
        return unauthorized();
    }
    if let Some(keyword) = query.keyword {
        recorded.lock().unwrap().keywords.push(keyword);
    }

    Json(json!({
        "data": [
            {"noticeId": 1, "title": "정기 점검", "regDate": "2024-03-01T09:00:00", "isPinned": "N"},
            {"noticeId": 2, "title": "안전 교육", "regDate": "2024-02-01T09:00:00", "isPinned": "Y"},
            {"title": "id 없음"}
        ]
    }))
    .into_response()
}

async fn get_notice(Path(id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == "slow" {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    Json(json!({"data": {"id": id, "title": "상세"}})).into_response()
}

async fn pin_notice(
    State(recorded): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded.lock().unwrap().bodies.push(body.clone());
    Json(json!({"id": id, "title": "정기 점검", "pinned": body["pinned"]}))
}

async fn attachment(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    ([("content-type", "application/pdf")], ATTACHMENT).into_response()
}

async fn create_comment(Path(community_id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"commentId": "c-1", "communityId": community_id, "content": body["content"]}))
}

async fn list_products(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        {"productId": "P1", "productName": "Gear", "qty": "12"},
        {"id": 2, "name": "Shaft", "quantity": 3}
    ]))
    .into_response()
}

async fn list_machines() -> Response {
    (StatusCode::CONFLICT, Json(json!({"message": MACHINES_FAILED}))).into_response()
}

async fn upload_workbook(State(recorded): State<Shared>, mut multipart: Multipart) -> Response {
    let mut rows = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();
        recorded.lock().unwrap().upload_fields.push((name, file_name));
        rows.push(json!({"machineId": "M1", "machineName": "Lathe", "bytes": bytes.len()}));
    }

    Json(json!({
        "data": {"rows": rows},
        "total": 2,
        "errors": [{"row": 3, "message": "machineId 누락"}]
    }))
    .into_response()
}

async fn schedule(Path(id): Path<String>) -> Response {
    if id == "empty" {
        return (StatusCode::OK, "").into_response();
    }
    Json(json!([
        {"productName": "Gear", "operationId": "OP20", "taskId": "T3", "machineId": "M2",
         "startAt": "2024-01-01T10:00:00", "endAt": "2024-01-01T11:00:00"},
        {"productName": "Gear", "operationId": "OP10", "taskId": "T2", "machineId": "M1",
         "startAt": "2024-01-01T09:00:00", "endAt": "2024-01-01T10:00:00"},
        {"productName": "Gear", "operationId": "OP10", "taskId": "T1", "machineId": "M1",
         "startAt": "2024-01-01T08:00:00", "endAt": "2024-01-01T08:00:30"},
        {"product_name": "Shaft", "operation_id": "OP10", "task_id": "T4",
         "machine": {"id": "M3", "name": "Mill"},
         "start_at": "2024-01-01T08:00:00Z", "end_at": "2024-01-01T12:00:00Z"},
        {"productName": "Shaft", "operationId": "OP30", "taskId": "T5"}
    ]))
    .into_response()
}

async fn summary() -> Json<Value> {
    Json(json!({"data": {"totalTasks": 5, "lateTasks": 1, "utilization": 72.5}}))
}

async fn search(State(recorded): State<Shared>, Query(query): Query<Search>) -> Json<Value> {
    let keyword = query.keyword.unwrap_or_default();
    recorded.lock().unwrap().keywords.push(keyword.clone());

    Json(json!({
        "products": [{"productId": "P1", "productName": format!("{} gear", keyword)}],
        "machines": [{"machineId": "M1", "machineName": "Lathe"}]
    }))
}
