// src/models/stats_models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Outcome of a single tier of the resolution pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub tier_name: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub groups_examined: usize,
    /// Groups with two or more members, i.e. ones the acceptance predicate saw.
    pub candidate_groups: usize,
    pub merge_units: usize,
    pub rows_discarded: usize,
    pub fields_backfilled: usize,
    pub elapsed_secs: f64,
}

impl TierStats {
    pub fn new(tier_name: &str, rows_in: usize) -> Self {
        Self {
            tier_name: tier_name.to_string(),
            rows_in,
            rows_out: rows_in,
            ..Default::default()
        }
    }

    pub fn is_noop(&self) -> bool {
        self.rows_discarded == 0 && self.fields_backfilled == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRunStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,
    pub input_rows: usize,
    pub output_rows: usize,
    pub tier_stats: Vec<TierStats>,
    pub distinct_group_ids: usize,
    pub null_key_rows: usize,
    pub normalized_signature: String,
    pub resolved_signature: String,
    pub total_time_secs: f64,
}

impl PipelineRunStats {
    pub fn rows_removed(&self) -> usize {
        self.input_rows.saturating_sub(self.output_rows)
    }
}
