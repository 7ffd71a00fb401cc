// ─── Test Fixtures ───
// In-process HTTP server that serves canned responses and counts hits per path.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
struct FixtureState {
    routes: Arc<Mutex<HashMap<String, (StatusCode, Vec<u8>)>>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

pub struct FixtureServer {
    addr: SocketAddr,
    state: FixtureState,
    handle: JoinHandle<()>,
}

impl FixtureServer {
    pub async fn start() -> Self {
        let state = FixtureState::default();
        let app = Router::new().fallback(respond).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn serve_json(&self, path: &str, body: serde_json::Value) {
        self.serve(path, StatusCode::OK, body.to_string().into_bytes());
    }

    pub fn serve_bytes(&self, path: &str, body: &[u8]) {
        self.serve(path, StatusCode::OK, body.to_vec());
    }

    pub fn serve_status(&self, path: &str, status: StatusCode) {
        self.serve(path, status, status.to_string().into_bytes());
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    fn serve(&self, path: &str, status: StatusCode, body: Vec<u8>) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body));
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(State(state): State<FixtureState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    *state.hits.lock().unwrap().entry(path.clone()).or_default() += 1;

    match state.routes.lock().unwrap().get(&path) {
        Some((status, body)) => (*status, body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Manifest fixture with `1.20.1` as latest release.
pub fn manifest_json(server: &FixtureServer) -> serde_json::Value {
    serde_json::json!({
        "latest": { "release": "1.20.1", "snapshot": "23w31a" },
        "versions": [
            { "id": "23w31a", "type": "snapshot", "url": server.url("/v/23w31a.json") },
            { "id": "1.20.1", "type": "release", "url": server.url("/v/1.20.1.json") },
            { "id": "1.19.4", "type": "release", "url": server.url("/v/1.19.4.json") }
        ]
    })
}

pub fn detail_json(server: &FixtureServer, id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "downloads": {
            "server": { "url": server.url(&format!("/jars/server-{id}.jar")), "size": 0, "sha1": "" }
        }
    })
}
