// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pedimentos_client::error::{ClientError, Result};
use pedimentos_client::services::{
    ApiClient, ApiResponse, AuthenticatedExecutor, FileSaver, SessionEvents,
    SessionExpiryReaction, TokenRefresher,
};
use pedimentos_client::store::{CredentialStore, MemoryStore};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const LOGIN_USER: &str = "admin";
pub const LOGIN_PASSWORD: &str = "secret";
pub const LOGIN_ACCESS: &str = "login-access";
pub const LOGIN_REFRESH: &str = "login-refresh";
pub const ZIP_PAYLOAD: &[u8] = b"PK\x03\x04fake-archive";
pub const REDIRECT_DELAY: Duration = Duration::from_millis(20);

// ─── Mock backend ────────────────────────────────────────────────────────────

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub bearer: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct BackendState {
    valid_access: Mutex<HashSet<String>>,
    refresh_grants: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<Recorded>>,
    refresh_calls: AtomicUsize,
    html_lists: AtomicBool,
}

/// In-process backend bound to an ephemeral local port.
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let app = Router::new()
            .route("/api/token/", post(login))
            .route("/api/token/refresh/", post(refresh))
            .route("/api/pedimentos/", get(list_pedimentos))
            .route("/api/pedimentos/{id}/documents/", get(list_documents))
            .route("/api/importers/", get(list_importers))
            .route("/api/users/", get(list_users).post(create_user))
            .route("/api/users/{id}/", axum::routing::patch(update_user).delete(delete_user))
            .route("/api/documents/{id}/download/", get(download_document))
            .route("/api/documents/bulk-download/", post(bulk_download))
            .route("/api/organization/storage/", get(storage_usage))
            .route("/api/reports/", post(generate_report))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.base_url, Duration::from_secs(5)).expect("api client")
    }

    /// Make the backend accept `token` as a bearer credential.
    pub fn accept_access(&self, token: &str) {
        self.state
            .valid_access
            .lock()
            .unwrap()
            .insert(token.to_string());
    }

    /// Make the refresh endpoint exchange `refresh_token` for `new_access`.
    pub fn grant_refresh(&self, refresh_token: &str, new_access: &str) {
        self.state
            .refresh_grants
            .lock()
            .unwrap()
            .insert(refresh_token.to_string(), new_access.to_string());
    }

    /// Serve list endpoints as an HTML page with a 200 status.
    pub fn serve_html_lists(&self) {
        self.state.html_lists.store(true, Ordering::SeqCst);
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn record(
    state: &BackendState,
    method: &'static str,
    path: String,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: Option<Value>,
) {
    state.requests.lock().unwrap().push(Recorded {
        method,
        path,
        bearer: bearer(headers),
        query,
        body,
    });
}

fn authorize(state: &BackendState, headers: &HeaderMap) -> std::result::Result<(), Response> {
    let token = bearer(headers).unwrap_or_default();
    if state.valid_access.lock().unwrap().contains(&token) {
        return Ok(());
    }
    Err((
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Given token not valid for any token type"})),
    )
        .into_response())
}

fn page(state: &BackendState, results: Vec<Value>) -> Response {
    if state.html_lists.load(Ordering::SeqCst) {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>Maintenance</body></html>",
        )
            .into_response();
    }
    Json(json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    }))
    .into_response()
}

fn binary(content_type: &'static str, body: Vec<u8>) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    if body["username"] == LOGIN_USER && body["password"] == LOGIN_PASSWORD {
        state
            .valid_access
            .lock()
            .unwrap()
            .insert(LOGIN_ACCESS.to_string());
        return Json(json!({
            "access": LOGIN_ACCESS,
            "refresh": LOGIN_REFRESH,
            "username": LOGIN_USER,
            "is_superuser": true,
        }))
        .into_response();
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "No active account found with the given credentials"})),
    )
        .into_response()
}

async fn refresh(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let presented = body["refresh_token"].as_str().unwrap_or_default();
    let granted = state.refresh_grants.lock().unwrap().get(presented).cloned();
    match granted {
        Some(access) => {
            state.valid_access.lock().unwrap().insert(access.clone());
            Json(json!({ "access": access })).into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response(),
    }
}

async fn list_pedimentos(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "GET", "/api/pedimentos/".to_string(), &headers, query, None);
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    page(
        &state,
        vec![
            json!({"id": "p1", "numero": "24 47 3001 4000123"}),
            json!({"id": "p2", "numero": "24 47 3001 4000124"}),
        ],
    )
}

async fn list_documents(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let path = format!("/api/pedimentos/{}/documents/", id);
    record(&state, "GET", path, &headers, query, None);
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    page(&state, vec![json!({"id": "d1", "pedimento": id})])
}

async fn list_importers(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "GET", "/api/importers/".to_string(), &headers, query, None);
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    page(&state, vec![json!({"rfc": "AAA010101AAA"})])
}

async fn list_users(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "GET", "/api/users/".to_string(), &headers, query, None);
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    page(&state, vec![json!({"id": 1, "username": LOGIN_USER})])
}

async fn create_user(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(
        &state,
        "POST",
        "/api/users/".to_string(),
        &headers,
        HashMap::new(),
        Some(body.clone()),
    );
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    if body["username"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["This field is required."]})),
        )
            .into_response();
    }
    let mut created = body;
    created["id"] = json!(42);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_user(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let path = format!("/api/users/{}/", id);
    record(&state, "PATCH", path, &headers, HashMap::new(), Some(body.clone()));
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    let mut updated = body;
    updated["id"] = json!(id);
    Json(updated).into_response()
}

async fn delete_user(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/api/users/{}/", id);
    record(&state, "DELETE", path, &headers, HashMap::new(), None);
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn download_document(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/api/documents/{}/download/", id);
    record(&state, "GET", path, &headers, HashMap::new(), None);
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    }
    binary("application/pdf", format!("contents of {}", id).into_bytes())
}

async fn bulk_download(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let json: Option<Value> = serde_json::from_slice(&body).ok();
    record(
        &state,
        "POST",
        "/api/documents/bulk-download/".to_string(),
        &headers,
        HashMap::new(),
        json,
    );
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    binary("application/zip", ZIP_PAYLOAD.to_vec())
}

async fn storage_usage(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    record(
        &state,
        "GET",
        "/api/organization/storage/".to_string(),
        &headers,
        HashMap::new(),
        None,
    );
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    Json(json!({"used_bytes": 2_500_000_000u64, "quota_bytes": 10_000_000_000u64})).into_response()
}

async fn generate_report(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(
        &state,
        "POST",
        "/api/reports/".to_string(),
        &headers,
        HashMap::new(),
        Some(body),
    );
    if let Err(resp) = authorize(&state, &headers) {
        return resp;
    }
    binary("text/csv", b"pedimento,fecha\n".to_vec())
}

// ─── Fakes ───────────────────────────────────────────────────────────────────

/// Refresher with a fixed outcome that counts its calls.
pub struct StubRefresher {
    new_access: Option<String>,
    calls: AtomicUsize,
    presented: Mutex<Vec<String>>,
}

impl StubRefresher {
    pub fn succeeding(new_access: &str) -> Self {
        Self {
            new_access: Some(new_access.to_string()),
            calls: AtomicUsize::new(0),
            presented: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            new_access: None,
            calls: AtomicUsize::new(0),
            presented: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn presented(&self) -> Vec<String> {
        self.presented.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenRefresher for StubRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.presented
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        self.new_access
            .clone()
            .ok_or_else(|| ClientError::RefreshFailed("HTTP 400".to_string()))
    }
}

/// Request factory that replays canned responses and records the tokens it
/// was called with.
pub struct Script {
    responses: Mutex<VecDeque<ApiResponse>>,
    tokens: Mutex<Vec<String>>,
}

impl Script {
    pub fn new(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn call(&self, token: String) -> std::future::Ready<Result<ApiResponse>> {
        self.tokens.lock().unwrap().push(token);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ApiResponse::new(500, "script exhausted"));
        std::future::ready(Ok(response))
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

/// Saver that keeps payloads in memory.
#[derive(Default)]
pub struct RecordingSaver {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingSaver {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

impl FileSaver for RecordingSaver {
    fn save(&self, file_name: &str, payload: &[u8]) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_string(), payload.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

/// Executor wired to a memory store and the given refresher.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub events: SessionEvents,
    pub refresher: Arc<StubRefresher>,
    pub executor: AuthenticatedExecutor,
}

pub fn harness(store: MemoryStore, refresher: StubRefresher) -> Harness {
    let store = Arc::new(store);
    let refresher = Arc::new(refresher);
    let events = SessionEvents::new();
    let dyn_store: Arc<dyn CredentialStore> = store.clone();
    let reaction =
        SessionExpiryReaction::new(dyn_store.clone(), events.clone(), "/login", REDIRECT_DELAY);
    let dyn_refresher: Arc<dyn TokenRefresher> = refresher.clone();
    let executor = AuthenticatedExecutor::new(dyn_store, dyn_refresher, reaction);
    Harness {
        store,
        events,
        refresher,
        executor,
    }
}
