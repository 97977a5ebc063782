//! Request handlers.

use crate::error::ApiError;
use crate::models::{
    ErrorResponse, FetchPositionsRequest, FetchPositionsResponse, HealthResponse, PositionsQuery,
    ServiceInfoResponse,
};
use crate::openapi::ApiDoc;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use perp_pnl_domain::value_objects::WalletAddress;
use tracing::info;
use url::Url;
use utoipa::OpenApi;

const SERVICE_NAME: &str = "perp-pnl";

/// Service status.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = ServiceInfoResponse)
    )
)]
pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: SERVICE_NAME.to_string(),
        status: "running".to_string(),
    })
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        rpc: state.config().rpc_display(),
    })
}

/// Fetches every open position of a wallet with PnL and ROI.
#[utoipa::path(
    post,
    path = "/fetch-positions",
    tag = "Positions",
    request_body = FetchPositionsRequest,
    responses(
        (status = 200, description = "Positions with PnL", body = FetchPositionsResponse),
        (status = 400, description = "Missing or malformed input", body = ErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn fetch_positions(
    State(state): State<AppState>,
    body: Result<Json<FetchPositionsRequest>, JsonRejection>,
) -> Result<Json<FetchPositionsResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    lookup(
        &state,
        ("walletAddress", request.wallet_address.as_deref()),
        request.rpc_url.as_deref(),
    )
    .await
}

/// Query-string variant of the position lookup on the default RPC endpoint.
#[utoipa::path(
    get,
    path = "/avantis-positions",
    tag = "Positions",
    params(PositionsQuery),
    responses(
        (status = 200, description = "Positions with PnL", body = FetchPositionsResponse),
        (status = 400, description = "Missing or malformed address", body = ErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn positions_by_query(
    State(state): State<AppState>,
    Query(query): Query<PositionsQuery>,
) -> Result<Json<FetchPositionsResponse>, ApiError> {
    lookup(&state, ("address", query.address.as_deref()), None).await
}

/// Answers CORS preflight requests that reach the router.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Generated OpenAPI document.
pub async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// `wallet` pairs the input field name with its value, so a missing value is
/// reported under the name the caller used.
async fn lookup(
    state: &AppState,
    wallet: (&str, Option<&str>),
    rpc_url: Option<&str>,
) -> Result<Json<FetchPositionsResponse>, ApiError> {
    let (field, value) = wallet;
    let wallet = match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => WalletAddress::parse(raw)?,
        _ => return Err(ApiError::Validation(format!("{field} required"))),
    };
    let rpc_url = rpc_url
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            Url::parse(raw).map_err(|e| ApiError::Validation(format!("Invalid rpcUrl: {e}")))
        })
        .transpose()?;

    info!(
        wallet = %wallet,
        rpc = rpc_url.as_ref().map_or("default", Url::as_str),
        "Fetching positions"
    );

    let report = state
        .position_service(rpc_url.as_ref())?
        .fetch_positions(&wallet)
        .await?;
    Ok(Json(report.into()))
}
