use crate::entities::{PairInfo, PairMap};
use std::collections::HashMap;

/// Builds the pair-index to `BASE/QUOTE` symbol map.
#[must_use]
pub fn resolve_pairs(pairs_info: &HashMap<u32, PairInfo>) -> PairMap {
    pairs_info
        .iter()
        .map(|(index, info)| (*index, info.symbol()))
        .collect()
}

/// Symbol for a pair index, or the synthetic `Pair N` label when the
/// metadata does not know the index.
#[must_use]
pub fn asset_label(pair_map: &PairMap, pair_index: u32) -> String {
    pair_map
        .get(&pair_index)
        .cloned()
        .unwrap_or_else(|| format!("Pair {pair_index}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_pairs_joins_symbols() {
        let mut info = HashMap::new();
        info.insert(0, PairInfo::new("ETH", "USD"));
        info.insert(7, PairInfo::new("ENA", "USD").with_feed_id("0xabc"));

        let map = resolve_pairs(&info);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&0], "ETH/USD");
        assert_eq!(map[&7], "ENA/USD");
    }

    #[test]
    fn test_asset_label_fallback() {
        let map = PairMap::from([(1, "BTC/USD".to_string())]);
        assert_eq!(asset_label(&map, 1), "BTC/USD");
        assert_eq!(asset_label(&map, 42), "Pair 42");
    }
}
