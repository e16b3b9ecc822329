// src/matching/manager.rs - Tier pipeline coordination: normalize, resolve tier by tier, assign ids
use chrono::Utc;
use indicatif::MultiProgress;
use log::info;
use std::time::Instant;
use uuid::Uuid;

use crate::entity_identification::assign_group_ids;
use crate::error::DedupeResult;
use crate::matching::completeness::{apply_backfill, resolve_group, Resolution};
use crate::matching::grouping::group_by;
use crate::matching::tiers::TierDefinition;
use crate::models::core::{RecordTable, RowId};
use crate::models::stats_models::{PipelineRunStats, TierStats};
use crate::normalization::normalize_table;
use crate::utils::get_memory_usage;
use crate::utils::pipeline_config::PipelineConfig;
use crate::utils::progress_bars::logging::{
    log_pipeline_completion, log_pipeline_phase, log_pipeline_start, TierLogger,
};
use crate::utils::progress_bars::progress_config::{add_bar, ProgressConfig};
use crate::utils::signature::table_signature;

/// Runs one tier over `table`: partition on the tier key, let the acceptance
/// predicate carve each candidate group into merge units, collapse every unit
/// onto its most complete record. A tier with nothing to merge returns its
/// input unchanged.
pub fn run_tier(
    mut table: RecordTable,
    tier: &TierDefinition,
    multi_progress: Option<&MultiProgress>,
) -> (RecordTable, TierStats) {
    let logger = TierLogger::new(&tier.name);
    let mut stats = TierStats::new(&tier.name, table.len());
    logger.log_start(&tier.key.to_string(), table.len());

    let partition = group_by(&table, &tier.key);
    stats.groups_examined = partition.len();
    stats.candidate_groups = partition.multi_member_count();
    logger.log_partition(stats.groups_examined, stats.candidate_groups);

    let pb = add_bar(multi_progress, stats.candidate_groups as u64, "    ");
    if let Some(pb) = &pb {
        pb.set_message(format!("{}: resolving groups", tier.name));
    }

    // Groups are disjoint, so every resolution is computed against the
    // tier's input and applied afterwards.
    let mut resolutions: Vec<Resolution> = Vec::new();
    for group in partition.iter().filter(|g| g.len() > 1) {
        let members = table.select(&group.members);
        let units = tier.acceptance.merge_units(&members);

        let before = resolutions.len();
        for unit in units.iter().filter(|u| u.len() > 1) {
            resolutions.push(resolve_group(&table.select(unit)));
        }
        if resolutions.len() == before {
            logger.log_rejected(&format!("{:?}", group.key), group.len());
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    logger.log_phase("Merging", Some(format!("{} units", resolutions.len()).as_str()));
    let mut discarded: Vec<RowId> = Vec::new();
    for resolution in &resolutions {
        stats.fields_backfilled += apply_backfill(&mut table, resolution);
        discarded.extend(resolution.discarded.iter().copied());
    }
    stats.merge_units = resolutions.len();
    stats.rows_discarded = discarded.len();

    let table = table.without_rows(&discarded);
    stats.rows_out = table.len();
    stats.elapsed_secs = logger.elapsed_secs();

    if let Some(pb) = pb {
        pb.finish_with_message(format!(
            "{}: {} rows discarded",
            tier.name, stats.rows_discarded
        ));
    }
    logger.log_completion(&stats);
    (table, stats)
}

/// Executes `tiers` strictly in order, each on the output of the previous one.
pub fn run_tier_pipeline(
    table: RecordTable,
    tiers: &[TierDefinition],
    multi_progress: Option<&MultiProgress>,
) -> (RecordTable, Vec<TierStats>) {
    let mut current = table;
    let mut all_stats = Vec::with_capacity(tiers.len());
    for tier in tiers {
        let (next, stats) = run_tier(current, tier, multi_progress);
        current = next;
        all_stats.push(stats);
    }
    (current, all_stats)
}

/// Full resolution: normalize, run every configured tier, stamp group ids.
/// The input table is never mutated.
pub fn run_entity_resolution_pipeline(
    table: &RecordTable,
    config: &PipelineConfig,
    progress_config: &ProgressConfig,
) -> DedupeResult<(RecordTable, PipelineRunStats)> {
    let start_time = Instant::now();
    config.validate()?;
    table.validate_row_ids()?;
    let suffixes = config.suffix_stripper()?;

    let run_id = Uuid::new_v4().to_string();
    let run_timestamp = Utc::now().naive_utc();
    log_pipeline_start(&run_id, &config.tier_names(), table.len());

    let multi_progress = progress_config.create_multi_progress();
    let main_pb = add_bar(multi_progress.as_ref(), config.tiers.len() as u64 + 2, "");
    let tier_progress = if progress_config.should_show_detailed() {
        multi_progress.as_ref()
    } else {
        None
    };
    let set_message = |phase: &str| {
        if let Some(pb) = &main_pb {
            if progress_config.should_show_memory() {
                pb.set_message(format!("{} (Memory: {} MB)", phase, get_memory_usage()));
            } else {
                pb.set_message(phase.to_string());
            }
        }
    };

    log_pipeline_phase("Normalization", Some("canonicalizing identity, location, code and social fields"));
    set_message("Normalizing");
    let normalized = normalize_table(table, &suffixes)?;
    let normalized_signature = table_signature(&normalized);
    if let Some(pb) = &main_pb {
        pb.inc(1);
    }

    log_pipeline_phase("Tiers", Some(format!("{} tiers", config.tiers.len()).as_str()));
    let mut current = normalized;
    let mut tier_stats = Vec::with_capacity(config.tiers.len());
    for tier in &config.tiers {
        set_message(&format!("Tier {}", tier.name));
        let (next, stats) = run_tier(current, tier, tier_progress);
        current = next;
        tier_stats.push(stats);
        if let Some(pb) = &main_pb {
            pb.inc(1);
        }
    }

    log_pipeline_phase("Group ids", Some(config.unifying_key.to_string().as_str()));
    set_message("Assigning group ids");
    let (resolved, assignment) = assign_group_ids(current, &config.unifying_key);
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.finish_with_message(format!("Resolved {} → {} rows", table.len(), resolved.len()));
    }

    let stats = PipelineRunStats {
        run_id,
        run_timestamp,
        input_rows: table.len(),
        output_rows: resolved.len(),
        tier_stats,
        distinct_group_ids: assignment.distinct_group_ids,
        null_key_rows: assignment.null_key_rows,
        normalized_signature,
        resolved_signature: table_signature(&resolved),
        total_time_secs: start_time.elapsed().as_secs_f64(),
    };
    log_pipeline_completion(&stats);
    info!("Entity resolution run {} complete", stats.run_id);

    Ok((resolved, stats))
}
