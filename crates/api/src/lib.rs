//! REST API server and endpoints.
//!
//! This crate exposes the position lookup over HTTP:
//! - Open position retrieval with PnL and ROI per position and in aggregate
//! - Liveness and status endpoints
//! - Allow-all CORS for browser front-ends
//! - OpenAPI document generated with utoipa

/// Prelude module for convenient imports.
pub mod prelude;

/// Environment configuration.
pub mod config;
/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// OpenAPI documentation.
pub mod openapi;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Service layer for API operations.
pub mod services;
/// Application state.
pub mod state;

#[cfg(test)]
mod testing;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use server::{ApiServer, ServerConfig};
pub use services::PositionService;
pub use state::AppState;
