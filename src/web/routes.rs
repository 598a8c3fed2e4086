//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Switching
        .route("/detect", get(handlers::detect))
        .route("/targets", get(handlers::targets))
        .route("/switch", get(handlers::switch))
        .route("/menu", get(handlers::menu))
        .route("/shortcuts", get(handlers::shortcuts))
        // Engine management
        .route(
            "/engines",
            get(handlers::list_engines).post(handlers::add_engine),
        )
        .route("/engines/:id", delete(handlers::remove_engine))
        .route("/engines/:id/enabled", post(handlers::set_enabled))
        // API routes
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http());

    if state.settings.server.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router.with_state(state)
}
