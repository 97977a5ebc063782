//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builds the application router with tracing and allow-all CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        .route(
            "/fetch-positions",
            post(handlers::fetch_positions).options(handlers::preflight),
        )
        .route(
            "/api/fetch-avantis",
            post(handlers::fetch_positions).options(handlers::preflight),
        )
        .route("/avantis-positions", get(handlers::positions_by_query))
        .route("/openapi.json", get(handlers::openapi_spec))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
