//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use perp_pnl_api::prelude::*;
//! ```

pub use crate::config::{AppConfig, ConfigError};
pub use crate::error::ApiError;
pub use crate::models::{
    ErrorResponse, FetchPositionsRequest, FetchPositionsResponse, HealthResponse,
    PositionResponse, PositionsData, ServiceInfoResponse, SummaryResponse,
};
pub use crate::routes::create_router;
pub use crate::server::{ApiServer, ServerConfig};
pub use crate::services::PositionService;
pub use crate::state::AppState;
