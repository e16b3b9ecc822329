// src/profiling.rs - Exploratory statistics over a company table
use log::info;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::core::{Column, RecordTable};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodePairCoverage {
    pub first: Column,
    pub second: Column,
    /// Share of rows with `first` that also carry `second`, in percent.
    /// `None` when no row has `first`.
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainFrequency {
    pub domain: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub total_rows: usize,
    pub non_null_counts: Vec<(Column, usize)>,
    pub code_pair_coverage: Vec<CodePairCoverage>,
    pub shared_domains: Vec<DomainFrequency>,
}

/// Coverage of every unordered pair of classification code columns.
pub fn code_pair_coverage(table: &RecordTable) -> Vec<CodePairCoverage> {
    let codes = Column::CLASSIFICATION_CODES;
    let mut coverage = Vec::new();
    for (i, first) in codes.iter().enumerate() {
        for second in &codes[i + 1..] {
            let with_first = table.iter().filter(|r| !r.is_null(*first)).count();
            let with_both = table
                .iter()
                .filter(|r| !r.is_null(*first) && !r.is_null(*second))
                .count();
            let percentage = if with_first == 0 {
                None
            } else {
                Some(with_both as f64 / with_first as f64 * 100.0)
            };
            coverage.push(CodePairCoverage {
                first: *first,
                second: *second,
                percentage,
            });
        }
    }
    coverage
}

/// Domains appearing on at least `min_rows` rows, most frequent first; ties
/// keep order of first appearance.
pub fn domain_frequency(table: &RecordTable, min_rows: usize) -> Vec<DomainFrequency> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, record) in table.iter().enumerate() {
        if let Some(domain) = record.get(Column::WebsiteDomain) {
            counts.entry(domain).or_insert((0, pos)).0 += 1;
        }
    }

    let mut frequent: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (rows, _))| *rows >= min_rows)
        .map(|(domain, (rows, first_seen))| (domain, rows, first_seen))
        .collect();
    frequent.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    frequent
        .into_iter()
        .map(|(domain, rows, _)| DomainFrequency {
            domain: domain.to_string(),
            rows,
        })
        .collect()
}

pub fn profile_table(table: &RecordTable) -> ProfileReport {
    ProfileReport {
        total_rows: table.len(),
        non_null_counts: Column::ALL
            .iter()
            .map(|c| (*c, table.non_null_in(*c)))
            .collect(),
        code_pair_coverage: code_pair_coverage(table),
        shared_domains: domain_frequency(table, 2),
    }
}

pub fn log_report(report: &ProfileReport) {
    info!("=== Table Profile ({} rows) ===", report.total_rows);
    for (column, count) in &report.non_null_counts {
        info!("  {:<26} {:>8} non-null", column.as_str(), count);
    }
    for pair in &report.code_pair_coverage {
        match pair.percentage {
            Some(pct) => info!(
                "  Rows with {} that also have {}: {:.1}%",
                pair.first, pair.second, pct
            ),
            None => info!("  No rows with {} to compare against {}", pair.first, pair.second),
        }
    }
    info!(
        "  {} website domains appear on more than one row",
        report.shared_domains.len()
    );
    for shared in report.shared_domains.iter().take(10) {
        info!("    {} ({} rows)", shared.domain, shared.rows);
    }
}
