// src/utils/progress_bars/logging.rs - Logging helpers for resolution tiers
use log::{debug, info};
use std::time::Instant;

use crate::models::stats_models::{PipelineRunStats, TierStats};

#[derive(Clone)]
pub struct TierLogger {
    tier_tag: String,
    start_time: Instant,
}

impl TierLogger {
    pub fn new(tier_name: &str) -> Self {
        Self {
            tier_tag: tier_name.to_uppercase(),
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, key: &str, rows_in: usize) {
        info!(
            "[{}] 🚀 Starting tier on {} rows, grouping by {}",
            self.tier_tag, rows_in, key
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] 🔄 Phase: {} - {} [+{:.1}s]",
                self.tier_tag,
                phase,
                details,
                elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] 🔄 Phase: {} [+{:.1}s]",
                self.tier_tag,
                phase,
                elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_partition(&self, total_groups: usize, candidate_groups: usize) {
        info!(
            "[{}] 📊 Partitioned into {} groups, {} with 2+ records",
            self.tier_tag, total_groups, candidate_groups
        );
    }

    pub fn log_rejected(&self, key: &str, size: usize) {
        debug!(
            "[{}] 🚫 Group {} with {} records failed the acceptance check",
            self.tier_tag, key, size
        );
    }

    pub fn log_completion(&self, stats: &TierStats) {
        if stats.is_noop() {
            info!(
                "[{}] ✨ No qualifying groups, table unchanged ({} rows) in {:.2}s",
                self.tier_tag, stats.rows_out, stats.elapsed_secs
            );
        } else {
            info!(
                "[{}] ✅ Merged {} units: {} → {} rows, {} fields back-filled in {:.2}s",
                self.tier_tag,
                stats.merge_units,
                stats.rows_in,
                stats.rows_out,
                stats.fields_backfilled,
                stats.elapsed_secs
            );
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

pub fn log_pipeline_start(run_id: &str, tier_names: &[&str], rows: usize) {
    info!("🚀 Starting entity resolution run {}", run_id);
    info!("📋 Tiers in execution order: {:?}", tier_names);
    info!("📊 Input rows: {}", rows);
}

pub fn log_pipeline_phase(phase: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("🔄 Pipeline phase: {} - {}", phase, d),
        None => info!("🔄 Pipeline phase: {}", phase),
    }
}

pub fn log_pipeline_completion(stats: &PipelineRunStats) {
    info!("=== Resolution Summary ===");
    info!("Run ID: {}", stats.run_id);
    info!(
        "Rows: {} → {} ({} merged away)",
        stats.input_rows,
        stats.output_rows,
        stats.rows_removed()
    );
    for tier in &stats.tier_stats {
        info!(
            "  {}: {} candidate groups, {} merged units, {} rows discarded",
            tier.tier_name, tier.candidate_groups, tier.merge_units, tier.rows_discarded
        );
    }
    info!(
        "Group ids: {} distinct, {} rows without a unifying key",
        stats.distinct_group_ids, stats.null_key_rows
    );
    info!("Resolved table signature: {}", stats.resolved_signature);
    info!("Total execution time: {:.2}s", stats.total_time_secs);
}
