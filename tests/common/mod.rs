#![allow(dead_code)]

use axum::body::Body;
use chatserver::config::Config;
use chatserver::db;
use chatserver::gateway::heartbeat::Heartbeat;
use chatserver::models::user::{CreateUser, User};
use chatserver::routes;
use chatserver::state::AppState;
use futures_util::{SinkExt, StreamExt};
use http::{Method, Request};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for an expected frame.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server that owns an in-memory SQLite pool and full AppState.
/// Each instance is isolated, safe for parallel tests.
pub struct TestServer {
    pub state: AppState,
}

impl TestServer {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let pool = db::create_pool("sqlite::memory:")
            .await
            .expect("failed to create test pool");
        Self {
            state: AppState::new(pool, &config),
        }
    }

    /// Returns an Axum Router wired to this server's state for `oneshot()` calls.
    pub fn router(&self) -> axum::Router {
        routes::router(self.state.clone())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.state.db
    }

    /// Binds a TCP listener on port 0, spawns the server, and returns the
    /// WebSocket URL of the chat endpoint.
    pub async fn spawn(&self) -> String {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("ws://127.0.0.1:{}/ws", addr.port())
    }

    pub async fn create_user(&self, email: &str) -> User {
        db::users::create_user(
            self.pool(),
            &CreateUser {
                email: Some(email.to_string()),
            },
        )
        .await
        .expect("failed to create test user")
    }

    pub fn live_connections(&self) -> usize {
        self.state.chat.dispatcher().live_count()
    }

    pub fn num_users(&self) -> usize {
        self.state.chat.presence().count()
    }

    /// Poll until the gateway reports exactly `n` live connections.
    pub async fn wait_for_connections(&self, n: usize) {
        for _ in 0..500 {
            if self.live_connections() == n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {n} live connections, found {}",
            self.live_connections()
        );
    }
}

/// Config pointing the static asset root at a directory that does not exist.
pub fn test_config() -> Config {
    let missing = format!("chatserver-missing-{}", uuid::Uuid::new_v4());
    Config {
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        public_dir: std::env::temp_dir().join(missing),
        outbound_buffer: 64,
        heartbeat: Heartbeat::default(),
    }
}

/// Config with a fast heartbeat so idle connections are dropped within a
/// fraction of a second.
pub fn fast_heartbeat_config() -> Config {
    Config {
        heartbeat: Heartbeat {
            interval: Duration::from_millis(50),
            timeout: Duration::from_millis(500),
        },
        ..test_config()
    }
}

/// Create a fresh temporary directory for static assets.
pub fn temp_public_dir() -> PathBuf {
    let name = format!("chatserver-public-{}", uuid::Uuid::new_v4());
    let dir = std::env::temp_dir().join(name);
    std::fs::create_dir_all(&dir).expect("failed to create temp public dir");
    dir
}

// ---------------------------------------------------------------------------
// Request builder helpers
// ---------------------------------------------------------------------------

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Parse a response body into a `serde_json::Value`.
pub async fn parse_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Chat client helpers
// ---------------------------------------------------------------------------

pub async fn connect(url: &str) -> WsClient {
    let (ws, _) = connect_async(url).await.unwrap();
    ws
}

/// Send one `{"event": ..., "data": ...}` frame.
pub async fn emit(ws: &mut WsClient, event: &str, data: Option<serde_json::Value>) {
    let mut frame = serde_json::json!({ "event": event });
    if let Some(data) = data {
        frame["data"] = data;
    }
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();
}

/// Connect and join under `name`, returning the client and its login frame.
pub async fn join(url: &str, name: &str) -> (WsClient, serde_json::Value) {
    let mut ws = connect(url).await;
    emit(&mut ws, "add user", Some(serde_json::json!(name))).await;
    let login = next_event(&mut ws).await;
    assert_eq!(login["event"], "login", "expected login, got {login}");
    (ws, login)
}

/// Next text frame as JSON, skipping control frames.
pub async fn next_event(ws: &mut WsClient) -> serde_json::Value {
    try_next_event(ws, RECV_TIMEOUT)
        .await
        .expect("timed out waiting for event")
}

pub async fn try_next_event(ws: &mut WsClient, wait: Duration) -> Option<serde_json::Value> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        let msg = tokio::time::timeout_at(deadline, ws.next()).await.ok()??;
        match msg.ok()? {
            Message::Text(text) => return Some(serde_json::from_str(&text).unwrap()),
            Message::Close(_) => return None,
            _ => continue,
        }
    }
}
