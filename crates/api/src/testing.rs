//! In-memory sources for service and handler tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use perp_pnl_data::{PairSource, PriceFeed, TradeSource, TradeSourceFactory};
use perp_pnl_domain::entities::{PairInfo, Trade};
use perp_pnl_domain::value_objects::WalletAddress;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

pub const WALLET: &str = "0x8a311D7048c35985aa31C131B9A13e03a5f7422d";

pub fn wallet() -> WalletAddress {
    WalletAddress::parse(WALLET).unwrap()
}

pub fn trade(pair_index: u32, is_long: bool, collateral: Decimal, open_price: Decimal) -> Trade {
    Trade {
        pair_index,
        trade_index: 0,
        is_long,
        open_collateral: collateral,
        leverage: dec!(10),
        open_price,
        take_profit: Decimal::ZERO,
        stop_loss: Decimal::ZERO,
        liquidation_price: Decimal::ZERO,
    }
}

pub struct FakeTrades {
    trades: Vec<Trade>,
}

impl FakeTrades {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self { trades }
    }
}

#[async_trait]
impl TradeSource for FakeTrades {
    async fn get_trades(&self, _trader: &WalletAddress) -> Result<Vec<Trade>> {
        Ok(self.trades.clone())
    }
}

/// Hands out one trade source and records the endpoints it was asked for.
pub struct FakeFactory {
    source: Arc<dyn TradeSource>,
    connected: Mutex<Vec<Url>>,
}

impl FakeFactory {
    pub fn new(source: Arc<dyn TradeSource>) -> Self {
        Self {
            source,
            connected: Mutex::new(Vec::new()),
        }
    }

    pub fn connected(&self) -> Vec<Url> {
        self.connected.lock().unwrap().clone()
    }
}

impl TradeSourceFactory for FakeFactory {
    fn connect(&self, rpc_url: &Url) -> Result<Arc<dyn TradeSource>> {
        self.connected.lock().unwrap().push(rpc_url.clone());
        Ok(self.source.clone())
    }
}

pub struct FakePairs {
    pairs: HashMap<u32, PairInfo>,
    calls: AtomicUsize,
}

impl FakePairs {
    /// ENA/USD at index 0, ETH/USD at index 1.
    pub fn standard() -> Self {
        Self {
            pairs: HashMap::from([
                (0, PairInfo::new("ENA", "USD").with_feed_id("0xb7910ba7")),
                (1, PairInfo::new("ETH", "USD").with_feed_id("0xff61491a")),
            ]),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PairSource for FakePairs {
    async fn get_pairs_info(&self) -> Result<HashMap<u32, PairInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pairs.clone())
    }
}

/// Prices symbols from a fixed table, optionally cutting the answer short.
pub struct FakePrices {
    prices: HashMap<String, Decimal>,
    limit: usize,
    requests: Mutex<Vec<Vec<String>>>,
    pairs_seen: Mutex<Vec<usize>>,
}

impl FakePrices {
    pub fn new(prices: &[(&str, Decimal)]) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(symbol, price)| (symbol.to_string(), *price))
                .collect(),
            limit: usize::MAX,
            requests: Mutex::new(Vec::new()),
            pairs_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn truncated_after(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }

    /// Size of the pair metadata handed over with each request.
    pub fn pairs_seen(&self) -> Vec<usize> {
        self.pairs_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceFeed for FakePrices {
    async fn get_latest_prices(
        &self,
        symbols: &[String],
        pairs: &HashMap<u32, PairInfo>,
    ) -> Result<Vec<Option<Decimal>>> {
        self.requests.lock().unwrap().push(symbols.to_vec());
        self.pairs_seen.lock().unwrap().push(pairs.len());
        Ok(symbols
            .iter()
            .map(|symbol| self.prices.get(symbol).copied())
            .take(self.limit)
            .collect())
    }
}

/// Every call fails as an unreachable upstream would.
pub struct FailingSource;

#[async_trait]
impl TradeSource for FailingSource {
    async fn get_trades(&self, _trader: &WalletAddress) -> Result<Vec<Trade>> {
        Err(anyhow!("rpc unreachable"))
    }
}

#[async_trait]
impl PairSource for FailingSource {
    async fn get_pairs_info(&self) -> Result<HashMap<u32, PairInfo>> {
        Err(anyhow!("pair metadata unreachable"))
    }
}
