//! Latest oracle prices from a Pyth Hermes endpoint.

use crate::PriceFeed;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use perp_pnl_domain::entities::PairInfo;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Default public Hermes endpoint.
pub const DEFAULT_HERMES_URL: &str = "https://hermes.pyth.network";

const LATEST_PRICE_PATH: &str = "v2/updates/price/latest";

#[derive(Debug, Deserialize)]
struct HermesResponse {
    #[serde(default)]
    parsed: Vec<ParsedPriceUpdate>,
}

#[derive(Debug, Deserialize)]
struct ParsedPriceUpdate {
    id: String,
    price: RawPrice,
}

/// Fixed-point price as published by the oracle: `price * 10^expo`.
#[derive(Debug, Deserialize)]
struct RawPrice {
    price: String,
    expo: i32,
}

impl RawPrice {
    fn converted(&self) -> Result<Decimal> {
        let mantissa: i64 = self
            .price
            .parse()
            .with_context(|| format!("invalid price mantissa {:?}", self.price))?;

        if self.expo <= 0 {
            Decimal::try_from_i128_with_scale(i128::from(mantissa), self.expo.unsigned_abs())
                .map_err(|e| anyhow!("price {mantissa}e{} out of range: {e}", self.expo))
        } else {
            10i64
                .checked_pow(self.expo.unsigned_abs())
                .and_then(|factor| Decimal::from(mantissa).checked_mul(Decimal::from(factor)))
                .ok_or_else(|| anyhow!("price {mantissa}e{} out of range", self.expo))
        }
    }
}

fn normalize_feed_id(id: &str) -> String {
    id.trim_start_matches("0x").to_ascii_lowercase()
}

/// Price feed resolving symbols to oracle feed ids through pair metadata.
#[derive(Debug, Clone)]
pub struct HermesPriceFeed {
    client: reqwest::Client,
    base_url: Url,
}

impl HermesPriceFeed {
    /// Creates a new price feed using a shared HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    async fn fetch_latest(&self, ids: &[&str]) -> Result<String> {
        let mut url = self
            .base_url
            .join(LATEST_PRICE_PATH)
            .context("invalid price feed url")?;
        {
            let mut query = url.query_pairs_mut();
            for id in ids {
                query.append_pair("ids[]", id);
            }
            query.append_pair("parsed", "true");
        }

        debug!(feeds = ids.len(), "Fetching latest prices");
        self.client
            .get(url)
            .send()
            .await
            .context("price feed request failed")?
            .error_for_status()
            .context("price feed returned an error status")?
            .text()
            .await
            .context("failed to read price feed body")
    }
}

#[async_trait]
impl PriceFeed for HermesPriceFeed {
    async fn get_latest_prices(
        &self,
        symbols: &[String],
        pairs: &HashMap<u32, PairInfo>,
    ) -> Result<Vec<Option<Decimal>>> {
        let requests = feed_requests(symbols, pairs);
        for (symbol, id) in symbols.iter().zip(&requests) {
            if id.is_none() {
                warn!(symbol = %symbol, "No oracle feed for symbol");
            }
        }

        let ids: Vec<&str> = requests.iter().flatten().map(String::as_str).collect();
        if ids.is_empty() {
            return Ok(vec![None; symbols.len()]);
        }

        let body = self.fetch_latest(&ids).await?;
        aligned_prices(&requests, &body)
    }
}

/// Normalized feed id per symbol, `None` for symbols without an oracle feed.
fn feed_requests(symbols: &[String], pairs: &HashMap<u32, PairInfo>) -> Vec<Option<String>> {
    let feed_ids: HashMap<String, String> = pairs
        .values()
        .filter_map(|pair| {
            pair.feed_id
                .as_deref()
                .map(|id| (pair.symbol(), normalize_feed_id(id)))
        })
        .collect();

    symbols
        .iter()
        .map(|symbol| feed_ids.get(symbol).cloned())
        .collect()
}

/// Prices in the order of `requests`; feeds the response does not cover stay
/// `None`.
fn aligned_prices(requests: &[Option<String>], body: &str) -> Result<Vec<Option<Decimal>>> {
    let response: HermesResponse = serde_json::from_str(body).context("malformed price feed")?;

    let by_id = response
        .parsed
        .iter()
        .map(|update| {
            update
                .price
                .converted()
                .map(|price| (normalize_feed_id(&update.id), price))
        })
        .collect::<Result<HashMap<_, _>>>()?;

    Ok(requests
        .iter()
        .map(|id| id.as_ref().and_then(|id| by_id.get(id).copied()))
        .collect())
}
