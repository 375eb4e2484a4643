mod health;
mod users;

use axum::handler::HandlerWithoutStateExt;
use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router: chat gateway, user store, static
/// assets.
pub fn router(state: AppState) -> Router {
    let assets =
        ServeDir::new(&state.public_dir).not_found_service(health::not_found.into_service());

    Router::new()
        .route("/health", get(health::health))
        .route("/version", get(health::version))
        .route("/stats", get(health::stats))
        .route("/ws", get(crate::gateway::ws_upgrade))
        .merge(user_routes())
        .fallback_service(assets)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}
