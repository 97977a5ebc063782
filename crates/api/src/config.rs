//! Environment configuration for the server and its upstream sources.

use crate::server::ServerConfig;
use perp_pnl_data::ContractAddresses;
use perp_pnl_data::providers::hermes::DEFAULT_HERMES_URL;
use perp_pnl_data::providers::socket_api::DEFAULT_PAIRS_API_URL;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default RPC endpoint when neither the environment nor the request names one.
pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Configuration errors, surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Missing configuration: {0}")]
    Missing(&'static str),
    /// A variable is set to an unusable value.
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    /// The shared HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The default trade source could not be created.
    #[error("Failed to connect trade source: {0}")]
    Connect(String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address.
    pub server: ServerConfig,
    /// RPC endpoint used when a request does not override it.
    pub default_rpc_url: Url,
    /// Pair metadata endpoint.
    pub pairs_api_url: Url,
    /// Price feed endpoint.
    pub hermes_url: Url,
    /// Storage contracts trades are read from. Required to serve positions.
    pub contracts: Option<ContractAddresses>,
    /// Timeout applied to pair and price requests.
    pub upstream_timeout: Duration,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, applying defaults for unset keys.
    ///
    /// # Errors
    /// Returns an error if a variable holds an invalid value, or if only some
    /// of the contract addresses are set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let upstream_timeout = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::Invalid {
                    key: "UPSTREAM_TIMEOUT_SECS",
                    reason: format!("{e}"),
                })?,
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            server: ServerConfig { host, port },
            default_rpc_url: parse_url("BASE_RPC_URL", get("BASE_RPC_URL"), DEFAULT_RPC_URL)?,
            pairs_api_url: parse_url("PAIRS_API_URL", get("PAIRS_API_URL"), DEFAULT_PAIRS_API_URL)?,
            hermes_url: parse_url("HERMES_URL", get("HERMES_URL"), DEFAULT_HERMES_URL)?,
            contracts: parse_contracts(
                get("TRADING_STORAGE_ADDRESS"),
                get("PAIR_STORAGE_ADDRESS"),
                get("PAIR_INFOS_ADDRESS"),
            )?,
            upstream_timeout,
        })
    }

    /// Shortened default RPC endpoint for status output.
    #[must_use]
    pub fn rpc_display(&self) -> String {
        let prefix: String = self.default_rpc_url.as_str().chars().take(50).collect();
        format!("{prefix}...")
    }
}

fn parse_url(key: &'static str, value: Option<String>, default: &str) -> Result<Url, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("{e}"),
    })
}

fn parse_contracts(
    trading_storage: Option<String>,
    pair_storage: Option<String>,
    pair_infos: Option<String>,
) -> Result<Option<ContractAddresses>, ConfigError> {
    match (trading_storage, pair_storage, pair_infos) {
        (None, None, None) => Ok(None),
        (Some(trading), Some(pairs), Some(infos)) => ContractAddresses::parse(&trading, &pairs, &infos)
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key: "contract address",
                reason: format!("{e:#}"),
            }),
        (None, _, _) => Err(ConfigError::Missing("TRADING_STORAGE_ADDRESS")),
        (_, None, _) => Err(ConfigError::Missing("PAIR_STORAGE_ADDRESS")),
        (_, _, None) => Err(ConfigError::Missing("PAIR_INFOS_ADDRESS")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.default_rpc_url.as_str(), "https://mainnet.base.org/");
        assert_eq!(config.hermes_url.host_str(), Some("hermes.pyth.network"));
        assert!(config.contracts.is_none());
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9100"),
            ("BASE_RPC_URL", "https://base.example.org/rpc"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("TRADING_STORAGE_ADDRESS", "0x8a311D7048c35985aa31C131B9A13e03a5f7422d"),
            ("PAIR_STORAGE_ADDRESS", "0x5db3772136e5557EFE028Db05EE95C84D76faEC4"),
            ("PAIR_INFOS_ADDRESS", "0x81F22d0Cc22977c91bEfE648C9fddf1f2bd977e5"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.default_rpc_url.path(), "/rpc");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert!(config.contracts.is_some());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            config(&[("BASE_RPC_URL", "not a url")]),
            Err(ConfigError::Invalid { key: "BASE_RPC_URL", .. })
        ));
    }

    #[test]
    fn test_partial_contracts_rejected() {
        let result = config(&[(
            "TRADING_STORAGE_ADDRESS",
            "0x8a311D7048c35985aa31C131B9A13e03a5f7422d",
        )]);
        assert!(matches!(
            result,
            Err(ConfigError::Missing("PAIR_STORAGE_ADDRESS"))
        ));
    }

    #[test]
    fn test_rpc_display_truncates() {
        let config = config(&[(
            "BASE_RPC_URL",
            "https://example-node.base-mainnet.quiknode.pro/0123456789abcdef0123456789abcdef/",
        )])
        .unwrap();

        let shown = config.rpc_display();
        assert_eq!(shown.chars().count(), 53);
        assert!(shown.ends_with("..."));
    }
}
