//! Resolution of upstream pair metadata and price snapshots into lookup maps.

mod pairs;
mod prices;

pub use pairs::{asset_label, resolve_pairs};
pub use prices::{resolve_prices, unique_symbols};
