// src/matching/mod.rs
pub mod completeness;
pub mod grouping;
pub mod manager;
pub mod tiers;

pub use grouping::{group_by, GroupKey, Partition};
pub use tiers::{Acceptance, TierDefinition};
