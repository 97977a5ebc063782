use crate::entities::{PairMap, PriceMap, Trade};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Distinct symbols referenced by `trades`, in order of first appearance.
///
/// Trades whose pair index is unknown to `pair_map` contribute nothing: their
/// synthetic label has no price feed.
#[must_use]
pub fn unique_symbols(trades: &[Trade], pair_map: &PairMap) -> Vec<String> {
    let mut seen = HashSet::new();
    trades
        .iter()
        .filter_map(|trade| pair_map.get(&trade.pair_index))
        .filter(|symbol| seen.insert(symbol.as_str()))
        .cloned()
        .collect()
}

/// Zips requested symbols with the prices returned for them.
///
/// `prices[i]` belongs to `symbols[i]`; a `None` leaves that symbol unpriced.
/// When the feed returns fewer entries than symbols were requested, the
/// trailing symbols are left unpriced.
#[must_use]
pub fn resolve_prices(symbols: &[String], prices: Vec<Option<Decimal>>) -> PriceMap {
    symbols
        .iter()
        .zip(prices)
        .filter_map(|(symbol, price)| price.map(|price| (symbol.clone(), price)))
        .collect()
}
