//! API error type and its HTTP mapping.

use crate::models::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use perp_pnl_domain::DomainError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request input.
    #[error("{0}")]
    Validation(String),
    /// A trade, pair or price source failed or returned malformed data.
    #[error("{0}")]
    Upstream(String),
    /// A trade record could not be enriched.
    #[error("{0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Wraps a source failure, keeping its full context chain.
    pub fn upstream(err: anyhow::Error) -> Self {
        Self::Upstream(format!("{err:#}"))
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::InvalidInput(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidWalletAddress(_) => Self::Validation(err.to_string()),
            DomainError::InvalidInput(_) => Self::InvalidInput(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
