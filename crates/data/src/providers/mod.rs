//! Provider implementations of the data source traits.

/// Pyth Hermes price feed.
pub mod hermes;
/// Protocol socket API pair metadata.
pub mod socket_api;
/// On-chain trading storage reader.
pub mod trading_storage;

pub use hermes::HermesPriceFeed;
pub use socket_api::SocketApiPairSource;
pub use trading_storage::{ContractAddresses, TradingStorageFactory, TradingStorageSource};
