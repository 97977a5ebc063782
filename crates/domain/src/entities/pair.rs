use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asset symbol per pair index.
pub type PairMap = HashMap<u32, String>;

/// Metadata for one tradable pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairInfo {
    /// Base asset, e.g. `ETH`.
    pub from: String,
    /// Quote asset, e.g. `USD`.
    pub to: String,
    /// Oracle feed identifier, when the pair has one.
    pub feed_id: Option<String>,
}

impl PairInfo {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            feed_id: None,
        }
    }

    #[must_use]
    pub fn with_feed_id(mut self, feed_id: impl Into<String>) -> Self {
        self.feed_id = Some(feed_id.into());
        self
    }

    /// `BASE/QUOTE` symbol.
    #[must_use]
    pub fn symbol(&self) -> String {
        format!("{}/{}", self.from, self.to)
    }
}
