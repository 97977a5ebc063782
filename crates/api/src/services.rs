//! Service layer orchestrating the upstream sources and enrichment.

use crate::error::ApiError;
use perp_pnl_data::{PairSource, PriceFeed, TradeSource};
use perp_pnl_domain::entities::{PairInfo, PositionReport, PriceMap};
use perp_pnl_domain::enrich;
use perp_pnl_domain::resolvers::{resolve_pairs, resolve_prices, unique_symbols};
use perp_pnl_domain::value_objects::WalletAddress;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds position reports from trades, pair metadata and prices.
#[derive(Clone)]
pub struct PositionService {
    trades: Arc<dyn TradeSource>,
    pairs: Arc<dyn PairSource>,
    prices: Arc<dyn PriceFeed>,
}

impl PositionService {
    /// Creates a new position service.
    pub fn new(
        trades: Arc<dyn TradeSource>,
        pairs: Arc<dyn PairSource>,
        prices: Arc<dyn PriceFeed>,
    ) -> Self {
        Self {
            trades,
            pairs,
            prices,
        }
    }

    /// Fetches and enriches every open position of `wallet`.
    ///
    /// A trader without open trades gets the empty report without any pair or
    /// price request being made.
    ///
    /// # Errors
    /// Returns [`ApiError::Upstream`] if a source fails, or
    /// [`ApiError::InvalidInput`] if a trade cannot be enriched.
    pub async fn fetch_positions(&self, wallet: &WalletAddress) -> Result<PositionReport, ApiError> {
        let trades = self
            .trades
            .get_trades(wallet)
            .await
            .map_err(ApiError::upstream)?;
        if trades.is_empty() {
            info!(wallet = %wallet, "No open trades");
            return Ok(PositionReport::empty());
        }

        let pairs_info = self.pairs_info().await?;
        let pair_map = resolve_pairs(&pairs_info);
        let symbols = unique_symbols(&trades, &pair_map);
        debug!(wallet = %wallet, trades = trades.len(), symbols = ?symbols, "Resolving prices");

        let price_map = self.latest_prices(&symbols, &pairs_info).await?;
        let report = enrich(&trades, &pair_map, &price_map)?;

        info!(
            wallet = %wallet,
            positions = report.total_positions,
            priced = price_map.len(),
            total_pnl = %report.summary.total_pnl,
            "Positions fetched"
        );
        Ok(report)
    }

    /// Raw pair metadata keyed by pair index.
    ///
    /// # Errors
    /// Returns [`ApiError::Upstream`] if the pair source fails.
    pub async fn pairs_info(&self) -> Result<HashMap<u32, PairInfo>, ApiError> {
        self.pairs
            .get_pairs_info()
            .await
            .map_err(ApiError::upstream)
    }

    /// Latest price per symbol, resolved against the given pair metadata;
    /// unpriced symbols are absent.
    ///
    /// # Errors
    /// Returns [`ApiError::Upstream`] if the price feed fails.
    pub async fn latest_prices(
        &self,
        symbols: &[String],
        pairs_info: &HashMap<u32, PairInfo>,
    ) -> Result<PriceMap, ApiError> {
        if symbols.is_empty() {
            return Ok(PriceMap::new());
        }
        let prices = self
            .prices
            .get_latest_prices(symbols, pairs_info)
            .await
            .map_err(ApiError::upstream)?;
        Ok(resolve_prices(symbols, prices))
    }
}
