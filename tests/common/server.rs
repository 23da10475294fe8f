//! In-process content API for end-to-end tests.
//!
//! Runs an axum server on its own thread and runtime so that both async
//! library tests and blocking CLI tests can talk to it.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;

use axum::extract::{Path, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};

/// Which REST convention the server speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `/list`, `/upload`, delete by body, plain update bodies
    Legacy,
    /// Collection root, delete by path, `{"contents": ..}` update bodies
    Rest,
}

/// One request as the server saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logged {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct ServerState {
    base_url: String,
    records: BTreeMap<(String, String), Value>,
    broken: HashSet<String>,
    mutation_failure: Option<(StatusCode, Value)>,
    index_down: bool,
    requests: Vec<Logged>,
}

type Shared = Arc<Mutex<ServerState>>;

pub struct MockServer {
    pub base_url: String,
    pub shape: Shape,
    state: Shared,
}

impl MockServer {
    pub fn start(shape: Shape) -> Self {
        let state: Shared = Arc::default();
        let app = router(shape, state.clone());

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("build runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind listener");
                let addr = listener.local_addr().expect("local addr");
                tx.send(addr).expect("report address");
                axum::serve(listener, app).await.expect("serve app");
            });
        });

        let addr = rx.recv().expect("server address");
        let base_url = format!("http://{addr}");
        state.lock().base_url = base_url.clone();
        Self {
            base_url,
            shape,
            state,
        }
    }

    pub fn seed(&self, kind: &str, filename: &str, record: Value) {
        self.state
            .lock()
            .records
            .insert((kind.to_string(), filename.to_string()), record);
    }

    pub fn record(&self, kind: &str, filename: &str) -> Option<Value> {
        self.state
            .lock()
            .records
            .get(&(kind.to_string(), filename.to_string()))
            .cloned()
    }

    pub fn filenames(&self, kind: &str) -> Vec<String> {
        self.state
            .lock()
            .records
            .keys()
            .filter(|(k, _)| k == kind)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Make the detail of `filename` answer 500.
    pub fn break_detail(&self, filename: &str) {
        self.state.lock().broken.insert(filename.to_string());
    }

    /// Reject every mutation with `status` and a JSON `message`.
    pub fn fail_mutations(&self, status: u16, message: &str) {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.state.lock().mutation_failure = Some((status, json!({ "message": message })));
    }

    /// Make the index answer 503 with a plain-text body.
    pub fn take_index_down(&self) {
        self.state.lock().index_down = true;
    }

    pub fn requests(&self) -> Vec<Logged> {
        self.state.lock().requests.clone()
    }
}

impl ServerState {
    fn entries(&self, kind: &str, absolute: bool) -> Vec<Value> {
        self.records
            .keys()
            .filter(|(k, _)| k == kind)
            .map(|(_, name)| {
                let encoded = urlencoding::encode(name);
                let path = format!("/files/{kind}/{encoded}");
                let url = if absolute {
                    format!("{}{path}", self.base_url)
                } else {
                    path
                };
                json!({ "url": url, "pathname": format!("{kind}/{encoded}") })
            })
            .collect()
    }

    fn failure(&self) -> Option<Response> {
        self.mutation_failure
            .clone()
            .map(|(status, body)| (status, Json(body)).into_response())
    }
}

fn router(shape: Shape, state: Shared) -> Router {
    let routes = match shape {
        Shape::Legacy => Router::new()
            .route("/api/{kind}/list", get(legacy_index))
            .route("/api/{kind}/upload", post(create))
            .route("/api/{kind}/delete", delete(delete_by_body))
            .route("/api/{kind}/{filename}", put(update_plain)),
        Shape::Rest => Router::new()
            .route("/api/{kind}", get(rest_index).post(create))
            .route(
                "/api/{kind}/{filename}",
                put(update_wrapped).delete(delete_by_path),
            ),
    };

    routes
        .route("/files/{kind}/{name}", get(detail))
        .layer(middleware::from_fn_with_state(state.clone(), log_request))
        .with_state(state)
}

async fn log_request(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().requests.push(Logged {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization,
    });
    next.run(request).await
}

/// Bare array of relative URLs, plus one malformed entry
async fn legacy_index(State(state): State<Shared>, Path(kind): Path<String>) -> Response {
    let state = state.lock();
    if state.index_down {
        return (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response();
    }
    let mut entries = state.entries(&kind, false);
    entries.push(json!({ "url": 5, "pathname": "" }));
    Json(Value::Array(entries)).into_response()
}

/// `{"data": [..]}` of absolute URLs
async fn rest_index(State(state): State<Shared>, Path(kind): Path<String>) -> Response {
    let state = state.lock();
    if state.index_down {
        return (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response();
    }
    Json(json!({ "data": state.entries(&kind, true) })).into_response()
}

async fn detail(
    State(state): State<Shared>,
    Path((kind, name)): Path<(String, String)>,
) -> Response {
    let state = state.lock();
    if state.broken.contains(&name) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "detail storage offline" })),
        )
            .into_response();
    }
    match state.records.get(&(kind, name)) {
        Some(record) => Json(record.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create(
    State(state): State<Shared>,
    Path(kind): Path<String>,
    Json(record): Json<Value>,
) -> Response {
    let mut state = state.lock();
    if let Some(failure) = state.failure() {
        return failure;
    }
    let filename = format!("{}.json", slug(record["title"].as_str().unwrap_or_default()));
    state.records.insert((kind, filename.clone()), record);
    (
        StatusCode::CREATED,
        Json(json!({ "ok": true, "filename": filename })),
    )
        .into_response()
}

async fn update_plain(
    State(state): State<Shared>,
    Path((kind, filename)): Path<(String, String)>,
    Json(record): Json<Value>,
) -> Response {
    replace(&state, kind, filename, record)
}

async fn update_wrapped(
    State(state): State<Shared>,
    Path((kind, filename)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let Some(record) = body["contents"]
        .as_str()
        .and_then(|c| serde_json::from_str::<Value>(c).ok())
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "contents must be a JSON string" })),
        )
            .into_response();
    };
    replace(&state, kind, filename, record)
}

fn replace(state: &Shared, kind: String, filename: String, record: Value) -> Response {
    let mut state = state.lock();
    if let Some(failure) = state.failure() {
        return failure;
    }
    match state.records.get_mut(&(kind, filename)) {
        Some(existing) => {
            *existing = record;
            Json(json!({ "ok": true })).into_response()
        }
        None => not_found(),
    }
}

async fn delete_by_body(
    State(state): State<Shared>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let filename = body["filename"].as_str().unwrap_or_default().to_string();
    let mut state = state.lock();
    if let Some(failure) = state.failure() {
        return failure;
    }
    match state.records.remove(&(kind, filename)) {
        Some(_) => Json(json!({ "ok": true })).into_response(),
        None => not_found(),
    }
}

async fn delete_by_path(
    State(state): State<Shared>,
    Path((kind, filename)): Path<(String, String)>,
) -> Response {
    let mut state = state.lock();
    if let Some(failure) = state.failure() {
        return failure;
    }
    match state.records.remove(&(kind, filename)) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "no such record" })),
    )
        .into_response()
}

fn slug(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}
