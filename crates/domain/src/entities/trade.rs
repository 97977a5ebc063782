use crate::enums::Direction;
use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open leveraged trade as read from the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub pair_index: u32,
    pub trade_index: u32,
    pub is_long: bool,
    /// Collateral posted when the trade was opened.
    pub open_collateral: Decimal,
    pub leverage: Decimal,
    pub open_price: Decimal,
    pub take_profit: Decimal,
    pub stop_loss: Decimal,
    pub liquidation_price: Decimal,
}

impl Trade {
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::from_is_long(self.is_long)
    }

    /// Rejects records whose collateral or leverage cannot be used as
    /// multiplicands or divisors.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidInput`] on negative collateral or leverage.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.open_collateral < Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "trade {}/{} has negative collateral {}",
                self.pair_index, self.trade_index, self.open_collateral
            )));
        }
        if self.leverage < Decimal::ZERO {
            return Err(DomainError::InvalidInput(format!(
                "trade {}/{} has negative leverage {}",
                self.pair_index, self.trade_index, self.leverage
            )));
        }
        Ok(())
    }
}
