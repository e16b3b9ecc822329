// src/matching/tiers.rs - Tier definitions as data: a grouping key plus an acceptance predicate
use std::collections::HashMap;

use crate::error::{DedupeError, DedupeResult};
use crate::matching::grouping::{partition_records, GroupKey};
use crate::models::core::{Column, Record, RowId};

/// Secondary check a candidate group must pass before anything is merged.
///
/// A predicate turns one candidate group into zero or more merge units; every
/// unit with two or more members is collapsed by the completeness resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    /// The whole group is one unit.
    Always,
    /// Each sub-group on this key is its own unit.
    SubGroupBy(GroupKey),
    /// The whole group is one unit only if all members agree on this key.
    UniformOn(GroupKey),
    /// The whole group is one unit only if no member has a null in these columns.
    RequireValues(GroupKey),
    /// Feeds every unit produced by one predicate through the next.
    Chain(Vec<Acceptance>),
}

impl Acceptance {
    pub fn merge_units(&self, members: &[&Record]) -> Vec<Vec<RowId>> {
        assert!(!members.is_empty(), "candidate groups are never empty");
        let all_ids = || members.iter().map(|r| r.row_id).collect::<Vec<_>>();

        match self {
            Acceptance::Always => vec![all_ids()],
            Acceptance::SubGroupBy(key) => partition_records(members.iter().copied(), key)
                .into_groups()
                .into_iter()
                .map(|g| g.members)
                .collect(),
            Acceptance::UniformOn(key) => {
                if partition_records(members.iter().copied(), key).len() == 1 {
                    vec![all_ids()]
                } else {
                    Vec::new()
                }
            }
            Acceptance::RequireValues(key) => {
                if members.iter().any(|r| key.has_null(r)) {
                    Vec::new()
                } else {
                    vec![all_ids()]
                }
            }
            Acceptance::Chain(steps) => {
                let by_id: HashMap<RowId, &Record> =
                    members.iter().map(|r| (r.row_id, *r)).collect();
                let mut units = vec![all_ids()];
                for step in steps {
                    units = units
                        .into_iter()
                        .flat_map(|unit| {
                            let unit_records: Vec<&Record> =
                                unit.iter().filter_map(|id| by_id.get(id).copied()).collect();
                            step.merge_units(&unit_records)
                        })
                        .collect();
                    if units.is_empty() {
                        break;
                    }
                }
                units
            }
        }
    }

    fn keys(&self) -> Vec<&GroupKey> {
        match self {
            Acceptance::Always => Vec::new(),
            Acceptance::SubGroupBy(k) | Acceptance::UniformOn(k) | Acceptance::RequireValues(k) => {
                vec![k]
            }
            Acceptance::Chain(steps) => steps.iter().flat_map(|s| s.keys()).collect(),
        }
    }
}

/// One stage of the resolution pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierDefinition {
    pub name: String,
    pub key: GroupKey,
    pub acceptance: Acceptance,
}

impl TierDefinition {
    pub fn new(name: &str, key: GroupKey, acceptance: Acceptance) -> Self {
        Self {
            name: name.to_string(),
            key,
            acceptance,
        }
    }

    /// Same domain and name at the same country/region/city.
    pub fn exact_location() -> Self {
        Self::new(
            "exact_location",
            GroupKey::new(&[Column::WebsiteDomain, Column::CompanyName]),
            Acceptance::SubGroupBy(GroupKey::new(&[
                Column::MainCountry,
                Column::MainRegion,
                Column::MainCity,
            ])),
        )
    }

    /// Same domain, name and city, merged only when every member shares one
    /// (industry, sector) pair.
    pub fn same_city_business() -> Self {
        Self::new(
            "same_city_business",
            GroupKey::new(&[Column::WebsiteDomain, Column::CompanyName, Column::MainCity]),
            Acceptance::UniformOn(GroupKey::new(&[Column::MainIndustry, Column::MainSector])),
        )
    }

    /// Same domain, name and classification code, merged only when every member
    /// carries the code and all agree on the country.
    pub fn shared_classification(code_column: Column) -> Self {
        Self::new(
            &format!("shared_{}", code_column),
            GroupKey::new(&[Column::WebsiteDomain, Column::CompanyName, code_column]),
            Acceptance::Chain(vec![
                Acceptance::RequireValues(GroupKey::new(&[code_column])),
                Acceptance::UniformOn(GroupKey::new(&[Column::MainCountry])),
            ]),
        )
    }

    pub fn default_tiers() -> Vec<Self> {
        vec![Self::exact_location(), Self::same_city_business()]
    }

    pub fn validate(&self) -> DedupeResult<()> {
        if self.key.is_empty() {
            return Err(DedupeError::EmptyGroupKey(format!(
                "grouping key of tier '{}'",
                self.name
            )));
        }
        if self.acceptance.keys().iter().any(|k| k.is_empty()) {
            return Err(DedupeError::EmptyGroupKey(format!(
                "acceptance key of tier '{}'",
                self.name
            )));
        }
        Ok(())
    }
}
