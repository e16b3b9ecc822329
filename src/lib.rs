// src/lib.rs
pub mod entity_identification;
pub mod error;
pub mod matching;
pub mod models;
pub mod normalization;
pub mod profiling;
pub mod utils;

pub use error::{DedupeError, DedupeResult};
pub use matching::manager::run_entity_resolution_pipeline;
pub use models::core::{Column, Record, RecordTable, RowId};
pub use utils::pipeline_config::PipelineConfig;
