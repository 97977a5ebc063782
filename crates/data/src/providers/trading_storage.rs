//! Open trades read from the protocol's storage contracts.
//!
//! Trades live in per-trader, per-pair slots of the trading storage
//! contract. A pair with a non-zero open trade count is scanned slot by slot;
//! empty slots carry zero leverage. Liquidation prices come from the pair
//! infos contract.

use crate::{TradeSource, TradeSourceFactory};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::future::try_join_all;
use perp_pnl_domain::entities::Trade;
use perp_pnl_domain::value_objects::WalletAddress;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Fixed-point decimals of prices, take profit, stop loss and liquidation price.
pub const PRICE_DECIMALS: u32 = 10;
/// Fixed-point decimals of leverage.
pub const LEVERAGE_DECIMALS: u32 = 10;
/// Fixed-point decimals of USDC collateral.
pub const COLLATERAL_DECIMALS: u32 = 6;

sol! {
    /// Trade slot as held by trading storage.
    #[derive(Debug, Default)]
    struct StoredTrade {
        address trader;
        uint256 pairIndex;
        uint256 index;
        uint256 initialPosToken;
        uint256 positionSizeUSDC;
        uint256 openPrice;
        bool buy;
        uint256 leverage;
        uint256 tp;
        uint256 sl;
        uint256 timestamp;
    }

    #[sol(rpc)]
    interface ITradingStorage {
        function maxTradesPerPair() external view returns (uint256);

        function openTradesCount(address trader, uint256 pairIndex) external view returns (uint256);

        function openTrades(
            address trader,
            uint256 pairIndex,
            uint256 index
        ) external view returns (StoredTrade memory);
    }

    #[sol(rpc)]
    interface IPairStorage {
        function pairsCount() external view returns (uint256);
    }

    #[sol(rpc)]
    interface IPairInfos {
        function getTradeLiquidationPrice(
            address trader,
            uint256 pairIndex,
            uint256 index,
            uint256 openPrice,
            bool long,
            uint256 collateral,
            uint256 leverage
        ) external view returns (uint256);
    }
}

/// Addresses of the contracts trades are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub trading_storage: Address,
    pub pair_storage: Address,
    pub pair_infos: Address,
}

impl ContractAddresses {
    /// Parses the three contract addresses from hex strings.
    ///
    /// # Errors
    /// Returns an error naming the first address that does not parse.
    pub fn parse(trading_storage: &str, pair_storage: &str, pair_infos: &str) -> Result<Self> {
        let parse = |name: &str, value: &str| {
            Address::from_str(value.trim())
                .with_context(|| format!("invalid {name} address {value:?}"))
        };
        Ok(Self {
            trading_storage: parse("trading storage", trading_storage)?,
            pair_storage: parse("pair storage", pair_storage)?,
            pair_infos: parse("pair infos", pair_infos)?,
        })
    }
}

/// Trade source reading storage contracts through one RPC endpoint.
pub struct TradingStorageSource {
    trading_storage: ITradingStorage::ITradingStorageInstance<DynProvider>,
    pair_storage: IPairStorage::IPairStorageInstance<DynProvider>,
    pair_infos: IPairInfos::IPairInfosInstance<DynProvider>,
}

impl TradingStorageSource {
    /// Creates a source bound to `rpc_url`. No request is made until trades
    /// are fetched.
    #[must_use]
    pub fn connect(rpc_url: &Url, contracts: &ContractAddresses) -> Self {
        let provider = ProviderBuilder::new()
            .connect_http(rpc_url.clone())
            .erased();

        Self {
            trading_storage: ITradingStorage::new(contracts.trading_storage, provider.clone()),
            pair_storage: IPairStorage::new(contracts.pair_storage, provider.clone()),
            pair_infos: IPairInfos::new(contracts.pair_infos, provider),
        }
    }

    async fn open_pairs(&self, trader: Address) -> Result<Vec<(U256, u64)>> {
        let pairs_count = self
            .pair_storage
            .pairsCount()
            .call()
            .await
            .context("pairsCount call failed")?;
        let pairs_count = to_u64(pairs_count, "pairs count")?;

        let storage = &self.trading_storage;
        let counts = try_join_all((0..pairs_count).map(|pair| async move {
            let pair = U256::from(pair);
            let count = storage
                .openTradesCount(trader, pair)
                .call()
                .await
                .with_context(|| format!("openTradesCount call failed for pair {pair}"))?;
            Ok::<_, anyhow::Error>((pair, to_u64(count, "open trades count")?))
        }))
        .await?;

        Ok(counts.into_iter().filter(|(_, count)| *count > 0).collect())
    }

    async fn liquidation_price(&self, trader: Address, stored: &StoredTrade) -> Result<U256> {
        self.pair_infos
            .getTradeLiquidationPrice(
                trader,
                stored.pairIndex,
                stored.index,
                stored.openPrice,
                stored.buy,
                stored.positionSizeUSDC,
                stored.leverage,
            )
            .call()
            .await
            .context("getTradeLiquidationPrice call failed")
    }
}

#[async_trait]
impl TradeSource for TradingStorageSource {
    async fn get_trades(&self, trader: &WalletAddress) -> Result<Vec<Trade>> {
        let trader = trader.address();

        let max_slots = self
            .trading_storage
            .maxTradesPerPair()
            .call()
            .await
            .context("maxTradesPerPair call failed")?;
        let max_slots = to_u64(max_slots, "max trades per pair")?;

        let open_pairs = self.open_pairs(trader).await?;
        debug!(trader = %trader, pairs = open_pairs.len(), "Pairs with open trades");

        let mut trades = Vec::new();
        for (pair, count) in open_pairs {
            let mut found = 0;
            for slot in 0..max_slots {
                let stored = self
                    .trading_storage
                    .openTrades(trader, pair, U256::from(slot))
                    .call()
                    .await
                    .with_context(|| format!("openTrades call failed for pair {pair} slot {slot}"))?;

                if stored.leverage.is_zero() {
                    continue;
                }

                let liquidation = self.liquidation_price(trader, &stored).await?;
                trades.push(trade_from_stored(&stored, liquidation)?);

                found += 1;
                if found == count {
                    break;
                }
            }
        }

        info!(trader = %trader, trades = trades.len(), "Open trades read");
        Ok(trades)
    }
}

/// Creates [`TradingStorageSource`]s for arbitrary RPC endpoints.
#[derive(Debug, Clone)]
pub struct TradingStorageFactory {
    contracts: ContractAddresses,
}

impl TradingStorageFactory {
    #[must_use]
    pub fn new(contracts: ContractAddresses) -> Self {
        Self { contracts }
    }
}

impl TradeSourceFactory for TradingStorageFactory {
    fn connect(&self, rpc_url: &Url) -> Result<Arc<dyn TradeSource>> {
        Ok(Arc::new(TradingStorageSource::connect(
            rpc_url,
            &self.contracts,
        )))
    }
}

fn to_u64(value: U256, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} {value} does not fit in 64 bits"))
}

fn to_u32(value: U256, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} {value} does not fit in 32 bits"))
}

/// Converts an unsigned fixed-point integer to a decimal.
fn fixed_point(value: U256, decimals: u32, field: &str) -> Result<Decimal> {
    let raw = u128::try_from(value)
        .ok()
        .and_then(|raw| i128::try_from(raw).ok())
        .ok_or_else(|| anyhow!("{field} {value} exceeds 127 bits"))?;
    Decimal::try_from_i128_with_scale(raw, decimals)
        .map_err(|e| anyhow!("{field} {value} out of decimal range: {e}"))
}

fn trade_from_stored(stored: &StoredTrade, liquidation_price: U256) -> Result<Trade> {
    Ok(Trade {
        pair_index: to_u32(stored.pairIndex, "pair index")?,
        trade_index: to_u32(stored.index, "trade index")?,
        is_long: stored.buy,
        open_collateral: fixed_point(stored.positionSizeUSDC, COLLATERAL_DECIMALS, "collateral")?,
        leverage: fixed_point(stored.leverage, LEVERAGE_DECIMALS, "leverage")?,
        open_price: fixed_point(stored.openPrice, PRICE_DECIMALS, "open price")?,
        take_profit: fixed_point(stored.tp, PRICE_DECIMALS, "take profit")?,
        stop_loss: fixed_point(stored.sl, PRICE_DECIMALS, "stop loss")?,
        liquidation_price: fixed_point(liquidation_price, PRICE_DECIMALS, "liquidation price")?,
    })
}
