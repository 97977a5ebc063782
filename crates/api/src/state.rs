//! Application state shared by all handlers.

use crate::config::{AppConfig, ConfigError};
use crate::error::ApiError;
use crate::services::PositionService;
use perp_pnl_data::{
    HermesPriceFeed, PairSource, PriceFeed, SocketApiPairSource, TradeSource, TradeSourceFactory,
    TradingStorageFactory,
};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Long-lived clients and configuration, built once at startup and cloned
/// into every request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    default_trades: Arc<dyn TradeSource>,
    trade_factory: Arc<dyn TradeSourceFactory>,
    pairs: Arc<dyn PairSource>,
    prices: Arc<dyn PriceFeed>,
}

impl AppState {
    /// Creates the state from explicit sources. The default trade source is
    /// connected to the configured RPC endpoint.
    ///
    /// # Errors
    /// Returns an error if the default trade source cannot be created.
    pub fn new(
        config: AppConfig,
        trade_factory: Arc<dyn TradeSourceFactory>,
        pairs: Arc<dyn PairSource>,
        prices: Arc<dyn PriceFeed>,
    ) -> Result<Self, ConfigError> {
        let default_trades = trade_factory
            .connect(&config.default_rpc_url)
            .map_err(|e| ConfigError::Connect(format!("{e:#}")))?;

        Ok(Self {
            config: Arc::new(config),
            default_trades,
            trade_factory,
            pairs,
            prices,
        })
    }

    /// Creates the state with the network-backed providers.
    ///
    /// # Errors
    /// Returns an error if contract addresses are not configured or a client
    /// cannot be built.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let contracts = config
            .contracts
            .ok_or(ConfigError::Missing("TRADING_STORAGE_ADDRESS"))?;
        let client = http_client(&config)?;

        let pairs = Arc::new(SocketApiPairSource::new(
            client.clone(),
            config.pairs_api_url.clone(),
        ));
        let prices = Arc::new(HermesPriceFeed::new(client, config.hermes_url.clone()));

        info!(rpc = %config.rpc_display(), "Upstream clients initialized");
        Self::new(
            config,
            Arc::new(TradingStorageFactory::new(contracts)),
            pairs,
            prices,
        )
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Position service reading trades through `rpc_url`, or through the
    /// default endpoint when `rpc_url` is `None` or equal to it.
    ///
    /// # Errors
    /// Returns [`ApiError::Upstream`] if a source for `rpc_url` cannot be created.
    pub fn position_service(&self, rpc_url: Option<&Url>) -> Result<PositionService, ApiError> {
        let trades = match rpc_url {
            Some(url) if *url != self.config.default_rpc_url => {
                debug!(rpc = %url, "Using request RPC endpoint");
                self.trade_factory.connect(url).map_err(ApiError::upstream)?
            }
            _ => self.default_trades.clone(),
        };

        Ok(PositionService::new(
            trades,
            self.pairs.clone(),
            self.prices.clone(),
        ))
    }
}

/// Shared HTTP client with the configured upstream timeout.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialized.
pub fn http_client(config: &AppConfig) -> Result<reqwest::Client, ConfigError> {
    Ok(reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFactory, FakePairs, FakePrices, FakeTrades};

    fn state(factory: Arc<FakeFactory>) -> AppState {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        AppState::new(
            config,
            factory,
            Arc::new(FakePairs::standard()),
            Arc::new(FakePrices::new(&[])),
        )
        .unwrap()
    }

    #[test]
    fn test_default_source_connected_once() {
        let factory = Arc::new(FakeFactory::new(Arc::new(FakeTrades::new(Vec::new()))));
        let state = state(factory.clone());

        state.position_service(None).unwrap();
        let default = state.config().default_rpc_url.clone();
        state.position_service(Some(&default)).unwrap();

        assert_eq!(factory.connected(), vec![default]);
    }

    #[test]
    fn test_request_rpc_override_connects() {
        let factory = Arc::new(FakeFactory::new(Arc::new(FakeTrades::new(Vec::new()))));
        let state = state(factory.clone());

        let custom = Url::parse("https://base.example.org/rpc").unwrap();
        state.position_service(Some(&custom)).unwrap();

        assert_eq!(factory.connected().len(), 2);
        assert_eq!(factory.connected()[1], custom);
    }

    #[test]
    fn test_from_config_requires_contracts() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert!(matches!(
            AppState::from_config(config),
            Err(ConfigError::Missing(_))
        ));
    }
}
