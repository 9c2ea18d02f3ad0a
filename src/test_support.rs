//! Shared fixtures for tests: sample posts and an in-process stand-in for the
//! static site host and the GitHub contents API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

use crate::models::{derive_id, Collection, Post};

/// A complete, valid post for `day`.
pub fn sample_post(day: i64) -> Post {
    Post {
        id: derive_id(day),
        day,
        date: "2026-02-21".to_string(),
        title: format!("Build number {}", day),
        screenshot: Some(format!("screenshots/day-{:03}.png", day)),
        time_spent: Some("2h".to_string()),
        difficulty: "medium".to_string(),
        tags: vec!["API".to_string()],
        what_i_built: "A small tool".to_string(),
        how_it_went: "Mostly smooth".to_string(),
        what_i_learned: "Plenty".to_string(),
        biggest_challenge: "Naming things".to_string(),
        link: Some("https://example.com".to_string()),
    }
}

/// A file stored in the mock repository.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub sha: String,
    pub content: Vec<u8>,
}

/// One create-or-update request received by the mock.
#[derive(Debug, Clone)]
pub struct RecordedWrite {
    pub path: String,
    pub message: String,
    pub sha: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Default)]
struct RemoteState {
    files: HashMap<String, RemoteFile>,
    next_sha: u64,
    posts_reads: usize,
    fail_posts_reads: usize,
    posts_delay_ms: u64,
    probes: Vec<String>,
    writes: Vec<RecordedWrite>,
    reject_writes: HashMap<String, u16>,
    expected_token: Option<String>,
}

/// Serves `GET /site/posts.json` from the repository's `posts.json` and a
/// minimal `/repos/{owner}/{repo}/contents/{path}` API over the same files.
#[derive(Clone)]
pub struct MockRemote {
    pub base_url: String,
    state: Arc<Mutex<RemoteState>>,
}

impl MockRemote {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(RemoteState::default()));

        let app = Router::new()
            .route("/site/posts.json", get(serve_posts))
            .route(
                "/repos/{owner}/{repo}/contents/{*path}",
                get(get_contents).put(put_contents),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock remote");
        let addr = listener.local_addr().expect("Failed to get addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn posts_url(&self) -> String {
        format!("{}/site/posts.json", self.base_url)
    }

    /// Only accept writes carrying `Bearer <token>`.
    pub fn expect_token(&self, token: &str) {
        self.state.lock().unwrap().expected_token = Some(token.to_string());
    }

    /// Store a file directly, returning its content hash.
    pub fn seed_file(&self, path: &str, content: &[u8]) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_sha += 1;
        let sha = format!("seed-sha-{}", state.next_sha);
        state.files.insert(
            path.to_string(),
            RemoteFile {
                sha: sha.clone(),
                content: content.to_vec(),
            },
        );
        sha
    }

    pub fn seed_posts(&self, collection: &Collection) -> String {
        let json = collection.to_pretty_json().unwrap();
        self.seed_file("posts.json", json.as_bytes())
    }

    pub fn file(&self, path: &str) -> Option<RemoteFile> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    /// The published document as currently stored.
    pub fn published(&self) -> Option<Collection> {
        self.file("posts.json")
            .map(|f| serde_json::from_slice(&f.content).unwrap())
    }

    pub fn posts_reads(&self) -> usize {
        self.state.lock().unwrap().posts_reads
    }

    pub fn fail_next_posts_reads(&self, count: usize) {
        self.state.lock().unwrap().fail_posts_reads = count;
    }

    pub fn set_posts_delay_ms(&self, delay_ms: u64) {
        self.state.lock().unwrap().posts_delay_ms = delay_ms;
    }

    /// Answer writes to `path` with `status` instead of storing them.
    pub fn reject_writes_to(&self, path: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .reject_writes
            .insert(path.to_string(), status);
    }

    pub fn probes(&self) -> Vec<String> {
        self.state.lock().unwrap().probes.clone()
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.state.lock().unwrap().writes.clone()
    }

    /// Every request the contents API has seen, probes and writes together.
    pub fn request_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.probes.len() + state.writes.len()
    }
}

type SharedState = Arc<Mutex<RemoteState>>;

async fn serve_posts(State(state): State<SharedState>) -> Response {
    let (delay_ms, fail, file) = {
        let mut state = state.lock().unwrap();
        state.posts_reads += 1;
        let fail = state.fail_posts_reads > 0;
        if fail {
            state.fail_posts_reads -= 1;
        }
        (state.posts_delay_ms, fail, state.files.get("posts.json").cloned())
    };

    if delay_ms > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
    }

    if fail {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }

    match file {
        Some(file) => (StatusCode::OK, file.content).into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

async fn get_contents(
    State(state): State<SharedState>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.probes.push(path.clone());

    match state.files.get(&path) {
        Some(file) => (
            StatusCode::OK,
            Json(json!({
                "path": path,
                "sha": file.sha,
                "content": STANDARD.encode(&file.content),
            })),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
    }
}

async fn put_contents(
    State(state): State<SharedState>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();

    let content = body["content"]
        .as_str()
        .and_then(|c| STANDARD.decode(c).ok())
        .unwrap_or_default();
    let sha = body["sha"].as_str().map(str::to_string);
    state.writes.push(RecordedWrite {
        path: path.clone(),
        message: body["message"].as_str().unwrap_or_default().to_string(),
        sha: sha.clone(),
        content: content.clone(),
    });

    if let Some(token) = &state.expected_token {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if authorization != format!("Bearer {}", token) {
            return (StatusCode::UNAUTHORIZED, "Bad credentials").into_response();
        }
    }

    if let Some(status) = state.reject_writes.get(&path) {
        let status = StatusCode::from_u16(*status).unwrap();
        return (status, "rejected by test").into_response();
    }

    let existing = state.files.get(&path).map(|f| f.sha.clone());
    if existing != sha {
        return (
            StatusCode::CONFLICT,
            format!("{} does not match {:?}", path, existing),
        )
            .into_response();
    }

    state.next_sha += 1;
    let new_sha = format!("sha-{}", state.next_sha);
    state.files.insert(
        path.clone(),
        RemoteFile {
            sha: new_sha.clone(),
            content,
        },
    );

    let status = if existing.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (status, Json(json!({ "content": { "path": path, "sha": new_sha } }))).into_response()
}
