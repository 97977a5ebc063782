use crate::enums::Direction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A trade combined with its resolved asset, current price and computed PnL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPosition {
    pub pair_index: u32,
    pub trade_index: u32,
    pub asset: String,
    pub direction: Direction,
    pub leverage: Decimal,
    /// Notional size, `margin * leverage`.
    pub position_size: Decimal,
    /// Collateral, never the leveraged size.
    pub margin: Decimal,
    pub entry_price: Decimal,
    pub current_price: Decimal,
    pub take_profit: Decimal,
    pub stop_loss: Decimal,
    pub liquidation_price: Decimal,
    pub pnl: Decimal,
    /// PnL as a percentage of margin.
    pub roi: Decimal,
}

/// Aggregate over every position of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(skip_serializing, default)]
    pub total_positions: usize,
    #[serde(rename = "totalPnL")]
    pub total_pnl: Decimal,
    #[serde(rename = "totalMargin")]
    pub total_margin: Decimal,
    #[serde(rename = "overallROI")]
    pub overall_roi: Decimal,
}

impl Summary {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_positions: 0,
            total_pnl: Decimal::ZERO,
            total_margin: Decimal::ZERO,
            overall_roi: Decimal::ZERO,
        }
    }
}

/// Enriched positions of one trader plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionReport {
    pub total_positions: usize,
    pub positions: Vec<EnrichedPosition>,
    pub summary: Summary,
}

impl PositionReport {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_positions: 0,
            positions: Vec::new(),
            summary: Summary::empty(),
        }
    }
}
