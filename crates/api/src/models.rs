//! API request and response models.

use perp_pnl_domain::entities::{EnrichedPosition, PositionReport, Summary};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of a position lookup.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FetchPositionsRequest {
    /// Trader wallet address.
    #[serde(default)]
    #[schema(example = "0x8a311D7048c35985aa31C131B9A13e03a5f7422d")]
    pub wallet_address: Option<String>,
    /// RPC endpoint overriding the configured default.
    #[serde(default)]
    pub rpc_url: Option<String>,
}

/// Query string of the GET position lookup.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PositionsQuery {
    /// Trader wallet address.
    pub address: Option<String>,
}

/// One open position with its PnL.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub pair_index: u32,
    pub trade_index: u32,
    #[schema(example = "ETH/USD")]
    pub asset: String,
    #[schema(example = "LONG")]
    pub direction: String,
    #[schema(value_type = f64)]
    pub leverage: Decimal,
    #[schema(value_type = f64)]
    pub position_size: Decimal,
    #[schema(value_type = f64)]
    pub margin: Decimal,
    #[schema(value_type = f64)]
    pub entry_price: Decimal,
    #[schema(value_type = f64)]
    pub current_price: Decimal,
    #[schema(value_type = f64)]
    pub take_profit: Decimal,
    #[schema(value_type = f64)]
    pub stop_loss: Decimal,
    #[schema(value_type = f64)]
    pub liquidation_price: Decimal,
    #[schema(value_type = f64)]
    pub pnl: Decimal,
    /// PnL as a percentage of margin.
    #[schema(value_type = f64)]
    pub roi: Decimal,
}

impl From<EnrichedPosition> for PositionResponse {
    fn from(position: EnrichedPosition) -> Self {
        Self {
            pair_index: position.pair_index,
            trade_index: position.trade_index,
            asset: position.asset,
            direction: position.direction.as_str().to_string(),
            leverage: position.leverage,
            position_size: position.position_size,
            margin: position.margin,
            entry_price: position.entry_price,
            current_price: position.current_price,
            take_profit: position.take_profit,
            stop_loss: position.stop_loss,
            liquidation_price: position.liquidation_price,
            pnl: position.pnl,
            roi: position.roi,
        }
    }
}

/// Aggregate PnL over all positions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryResponse {
    #[serde(rename = "totalPnL")]
    #[schema(value_type = f64)]
    pub total_pnl: Decimal,
    #[serde(rename = "totalMargin")]
    #[schema(value_type = f64)]
    pub total_margin: Decimal,
    #[serde(rename = "overallROI")]
    #[schema(value_type = f64)]
    pub overall_roi: Decimal,
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        Self {
            total_pnl: summary.total_pnl,
            total_margin: summary.total_margin,
            overall_roi: summary.overall_roi,
        }
    }
}

/// Positions of one trader.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionsData {
    pub total_positions: usize,
    pub positions: Vec<PositionResponse>,
    pub summary: SummaryResponse,
}

impl From<PositionReport> for PositionsData {
    fn from(report: PositionReport) -> Self {
        Self {
            total_positions: report.total_positions,
            positions: report.positions.into_iter().map(Into::into).collect(),
            summary: report.summary.into(),
        }
    }
}

/// Successful position lookup.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FetchPositionsResponse {
    pub success: bool,
    pub data: PositionsData,
}

impl From<PositionReport> for FetchPositionsResponse {
    fn from(report: PositionReport) -> Self {
        Self {
            success: true,
            data: report.into(),
        }
    }
}

/// Failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Service status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub status: String,
}

/// Health check result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Shortened default RPC endpoint.
    pub rpc: String,
}
