use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::state::AppState;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Live connection and joined-user counts.
pub async fn stats(state: State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "connections": state.chat.dispatcher().live_count(),
        "numUsers": state.chat.presence().count(),
    }))
}

/// Fallback for paths that match neither a route nor a static file.
pub async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "status": "Document does not exist" })),
    )
}
