pub mod pair;
pub mod position;
pub mod trade;

// Re-export for easier access
pub use pair::{PairInfo, PairMap};
pub use position::{EnrichedPosition, PositionReport, Summary};
pub use trade::Trade;

use rust_decimal::Decimal;
use std::collections::HashMap;

/// Latest converted price per asset symbol. Absent symbols have no feed data.
pub type PriceMap = HashMap<String, Decimal>;
