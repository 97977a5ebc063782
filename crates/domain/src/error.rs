use thiserror::Error;

/// Errors raised while validating or enriching trade data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A trade record carries values that cannot be enriched.
    #[error("Invalid trade input: {0}")]
    InvalidInput(String),
    /// A wallet address is not a 20-byte hex address.
    #[error("Invalid wallet address: {0}")]
    InvalidWalletAddress(String),
}
