//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use perp_pnl_domain::prelude::*;
//! ```

pub use crate::enrichment::enrich;
pub use crate::entities::{
    EnrichedPosition, PairInfo, PairMap, PositionReport, PriceMap, Summary, Trade,
};
pub use crate::enums::Direction;
pub use crate::error::DomainError;
pub use crate::metrics::{directional_pnl, position_size, roi_percent};
pub use crate::resolvers::{asset_label, resolve_pairs, resolve_prices, unique_symbols};
pub use crate::value_objects::WalletAddress;
