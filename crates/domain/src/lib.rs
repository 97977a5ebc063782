//! Domain model for open perpetuals positions.
//!
//! This crate holds everything that does not touch the network:
//! - Trade, pair metadata and enriched position entities
//! - Pair and price resolution from upstream snapshots
//! - Directional PnL and ROI metrics
//! - Position enrichment with aggregate summary

/// Prelude module for convenient imports.
pub mod prelude;

/// Position enrichment.
pub mod enrichment;
/// Domain entities.
pub mod entities;
/// Domain enumerations.
pub mod enums;
/// Error types.
pub mod error;
/// PnL and ROI arithmetic.
pub mod metrics;
/// Pair and price resolution.
pub mod resolvers;
/// Validated value objects.
pub mod value_objects;

pub use enrichment::enrich;
pub use error::DomainError;
