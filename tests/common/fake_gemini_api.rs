//! Fake Gemini `generateContent` endpoint for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `POST /{model}:generateContent` with a canned status and body
//!
//! The reflection client is blocking, so the server runs on its own Tokio
//! runtime thread and the test code stays synchronous. Every request is
//! recorded for assertions.
//!
//! # Example
//!
//! ```rust,no_run
//! use common::fake_gemini_api::FakeGeminiApi;
//!
//! let api = FakeGeminiApi::start();
//! api.respond_with_text(r#"{"reflection": "...", "bibleVerse": "..."}"#);
//!
//! // Point the client at api.base_url()
//! let url = api.base_url();
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Last path segment, e.g. `test-model:generateContent`.
    pub call: String,
    /// The `key` query parameter.
    pub key: Option<String>,
    pub body: serde_json::Value,
}

/// State shared between the router and test code.
struct ApiState {
    status: StatusCode,
    body: String,
    requests: Vec<RecordedRequest>,
}

impl Default for ApiState {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            body: "{}".to_string(),
            requests: Vec::new(),
        }
    }
}

/// Handle to the running fake Gemini server.
pub struct FakeGeminiApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeGeminiApi {
    /// Start the server on a random port. Returns once it is listening.
    pub fn start() -> Self {
        let state = Arc::new(Mutex::new(ApiState::default()));
        let (ready_tx, ready_rx) = mpsc::channel();

        let app = Router::new()
            .route("/{call}", post(generate_content))
            .with_state(state.clone());

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind fake Gemini API");
                ready_tx
                    .send(listener.local_addr().expect("listener address"))
                    .expect("test is waiting for the address");
                axum::serve(listener, app).await.expect("fake Gemini API");
            });
        });

        let addr = ready_rx.recv().expect("fake Gemini API failed to start");
        Self { addr, state }
    }

    /// Base URL to hand to the client (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer with a successful response whose first candidate carries `text`.
    pub fn respond_with_text(&self, text: &str) {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        });
        self.respond(StatusCode::OK, body.to_string());
    }

    /// Answer every request with `status` and a raw `body`.
    pub fn respond(&self, status: StatusCode, body: String) {
        let mut state = self.state.lock().unwrap();
        state.status = status;
        state.body = body;
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn generate_content(
    State(state): State<Arc<Mutex<ApiState>>>,
    Path(call): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        call,
        key: params.get("key").cloned(),
        body,
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}
