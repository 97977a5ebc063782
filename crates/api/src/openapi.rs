//! OpenAPI documentation configuration.
//!
//! Generates the OpenAPI document served at `/openapi.json` using utoipa.

use crate::handlers;
use crate::models::{
    ErrorResponse, FetchPositionsRequest, FetchPositionsResponse, HealthResponse,
    PositionResponse, PositionsData, ServiceInfoResponse, SummaryResponse,
};
use utoipa::OpenApi;

/// OpenAPI documentation structure.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Perp PnL API",
        version = "0.1.0",
        description = "Open positions of a perpetuals trader with live prices, \
                       per-position PnL and ROI, and portfolio totals.",
        license(
            name = "MIT OR Apache-2.0",
            url = "https://github.com/joaquinbejar/perp-pnl"
        ),
        contact(
            name = "Joaquín Béjar García",
            email = "jb@taunais.com"
        )
    ),
    tags(
        (name = "Health", description = "Service status endpoints"),
        (name = "Positions", description = "Open position lookup")
    ),
    paths(
        handlers::service_info,
        handlers::health,
        handlers::fetch_positions,
        handlers::positions_by_query,
    ),
    components(
        schemas(
            ServiceInfoResponse,
            HealthResponse,
            FetchPositionsRequest,
            FetchPositionsResponse,
            PositionsData,
            PositionResponse,
            SummaryResponse,
            ErrorResponse,
        )
    )
)]
pub struct ApiDoc;

/// Returns the OpenAPI JSON specification.
#[must_use]
pub fn openapi_json() -> String {
    ApiDoc::openapi().to_pretty_json().unwrap_or_default()
}
