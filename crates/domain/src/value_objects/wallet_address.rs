use crate::error::DomainError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `0x`-prefixed, 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(Address);

impl WalletAddress {
    /// Parses and validates an address. Surrounding whitespace is ignored and
    /// the `0x` prefix is required.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidWalletAddress`] if the input is not
    /// `0x` followed by 40 hex digits.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        let invalid = || DomainError::InvalidWalletAddress(trimmed.to_string());

        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(invalid)?;
        if hex.len() != 40 {
            return Err(invalid());
        }
        Address::from_str(hex).map(Self).map_err(|_| invalid())
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.0
    }
}

impl From<Address> for WalletAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl FromStr for WalletAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.to_string()
    }
}

/// Checksummed (EIP-55) form.
impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_checksum(None))
    }
}
