//! Pair metadata from the protocol's public socket API.

use crate::PairSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use perp_pnl_domain::entities::PairInfo;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Default public pair metadata endpoint.
pub const DEFAULT_PAIRS_API_URL: &str = "https://socket-api-pub.avantisfi.com/socket-api/v1/data";

#[derive(Debug, Deserialize)]
struct SocketApiResponse {
    data: SocketApiData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocketApiData {
    pair_infos: HashMap<u32, SocketPairInfo>,
}

#[derive(Debug, Deserialize)]
struct SocketPairInfo {
    from: String,
    to: String,
    #[serde(default)]
    feed: Option<SocketFeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocketFeed {
    #[serde(default)]
    feed_id: Option<String>,
}

impl From<SocketPairInfo> for PairInfo {
    fn from(raw: SocketPairInfo) -> Self {
        Self {
            from: raw.from,
            to: raw.to,
            feed_id: raw.feed.and_then(|feed| feed.feed_id),
        }
    }
}

/// Reads pair metadata over HTTP.
#[derive(Debug, Clone)]
pub struct SocketApiPairSource {
    client: reqwest::Client,
    url: Url,
}

impl SocketApiPairSource {
    /// Creates a new pair source using a shared HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl PairSource for SocketApiPairSource {
    async fn get_pairs_info(&self) -> Result<HashMap<u32, PairInfo>> {
        debug!(url = %self.url, "Fetching pair metadata");

        let body = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("pair metadata request failed")?
            .error_for_status()
            .context("pair metadata endpoint returned an error status")?
            .text()
            .await
            .context("failed to read pair metadata body")?;

        parse_pairs(&body)
    }
}

fn parse_pairs(body: &str) -> Result<HashMap<u32, PairInfo>> {
    let response: SocketApiResponse =
        serde_json::from_str(body).context("malformed pair metadata")?;

    Ok(response
        .data
        .pair_infos
        .into_iter()
        .map(|(index, raw)| (index, PairInfo::from(raw)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let body = r#"{
            "success": true,
            "data": {
                "pairCount": 3,
                "pairInfos": {
                    "0": {"index": 0, "from": "ETH", "to": "USD", "feed": {"feedId": "0xff61491a"}},
                    "1": {"index": 1, "from": "BTC", "to": "USD", "feed": {"feedId": "0xe62df6c8"}},
                    "22": {"index": 22, "from": "ZORA", "to": "USD"}
                }
            }
        }"#;

        let pairs = parse_pairs(body).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[&0].symbol(), "ETH/USD");
        assert_eq!(pairs[&1].feed_id.as_deref(), Some("0xe62df6c8"));
        assert_eq!(pairs[&22].feed_id, None);
    }

    #[test]
    fn test_parse_pairs_rejects_bad_index() {
        let body = r#"{"data": {"pairInfos": {"eth": {"from": "ETH", "to": "USD"}}}}"#;
        assert!(parse_pairs(body).is_err());
    }

    #[test]
    fn test_parse_pairs_rejects_missing_data() {
        assert!(parse_pairs(r#"{"success": false}"#).is_err());
    }
}
