// src/entity_identification/mod.rs
pub mod entity_id;

pub use entity_id::{assign_group_ids, GroupIdAssignment, NULL_GROUP_ID};
