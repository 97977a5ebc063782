//! Upstream data sources for trader positions.
//!
//! This crate defines the collaborator seams the position pipeline reads
//! through, and the network-backed providers behind them:
//! - Open trades read from the protocol's storage contracts over JSON-RPC
//! - Pair metadata from the protocol's public data endpoint
//! - Latest oracle prices from a Pyth Hermes endpoint

/// Network-backed provider implementations.
pub mod providers;

use anyhow::Result;
use async_trait::async_trait;
use perp_pnl_domain::entities::{PairInfo, Trade};
use perp_pnl_domain::value_objects::WalletAddress;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Source of a trader's open trades.
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// Fetches every open trade of `trader`.
    async fn get_trades(&self, trader: &WalletAddress) -> Result<Vec<Trade>>;
}

/// Builds trade sources bound to a given RPC endpoint.
pub trait TradeSourceFactory: Send + Sync {
    /// Creates a trade source reading through `rpc_url`.
    ///
    /// # Errors
    /// Returns an error if the endpoint cannot be used.
    fn connect(&self, rpc_url: &Url) -> Result<Arc<dyn TradeSource>>;
}

/// Source of pair metadata, keyed by pair index.
#[async_trait]
pub trait PairSource: Send + Sync {
    async fn get_pairs_info(&self) -> Result<HashMap<u32, PairInfo>>;
}

/// Source of latest prices.
///
/// `pairs` is the pair metadata already fetched for the request; feeds that
/// key their prices by oracle id resolve symbols through it.
///
/// The returned vector is positionally aligned with `symbols`: element `i` is
/// the price of `symbols[i]`, `None` when the feed has no price for it. It may
/// be shorter than `symbols`, in which case the trailing symbols have no price.
/// It is never reordered.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn get_latest_prices(
        &self,
        symbols: &[String],
        pairs: &HashMap<u32, PairInfo>,
    ) -> Result<Vec<Option<Decimal>>>;
}

pub use providers::{
    ContractAddresses, HermesPriceFeed, SocketApiPairSource, TradingStorageFactory,
    TradingStorageSource,
};
