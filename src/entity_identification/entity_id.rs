// src/entity_identification/entity_id.rs
use log::info;
use std::collections::HashMap;

use crate::matching::grouping::{GroupKey, KeyTuple};
use crate::models::core::RecordTable;

/// Group id given to rows whose unifying key is missing.
pub const NULL_GROUP_ID: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupIdAssignment {
    pub distinct_group_ids: usize,
    pub null_key_rows: usize,
}

/// Stamps every row with a `group_id`: distinct unifying-key values are
/// numbered 0, 1, 2, ... in order of first appearance, and rows with a null in
/// any key component get [`NULL_GROUP_ID`].
pub fn assign_group_ids(
    mut table: RecordTable,
    unifying_key: &GroupKey,
) -> (RecordTable, GroupIdAssignment) {
    let mut ids: HashMap<KeyTuple, i64> = HashMap::new();
    let mut assignment = GroupIdAssignment::default();

    for row_id in table.row_ids() {
        let Some(record) = table.get_mut(row_id) else {
            continue;
        };
        if unifying_key.has_null(record) {
            record.group_id = Some(NULL_GROUP_ID);
            assignment.null_key_rows += 1;
            continue;
        }
        let next_id = ids.len() as i64;
        let id = *ids.entry(unifying_key.extract(record)).or_insert(next_id);
        record.group_id = Some(id);
    }

    assignment.distinct_group_ids = ids.len();
    info!(
        "Assigned {} group ids on {}, {} rows left unassigned ({})",
        assignment.distinct_group_ids, unifying_key, assignment.null_key_rows, NULL_GROUP_ID
    );
    (table, assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::{Column, Record};

    fn domain_key() -> GroupKey {
        GroupKey::new(&[Column::WebsiteDomain])
    }

    #[test]
    fn test_ids_follow_first_appearance() {
        let table = RecordTable::new(vec![
            Record::new(0).with(Column::WebsiteDomain, "b.com"),
            Record::new(1).with(Column::WebsiteDomain, "a.com"),
            Record::new(2).with(Column::WebsiteDomain, "b.com"),
        ]);
        let (table, assignment) = assign_group_ids(table, &domain_key());
        let ids: Vec<Option<i64>> = table.iter().map(|r| r.group_id).collect();
        assert_eq!(ids, vec![Some(0), Some(1), Some(0)]);
        assert_eq!(assignment.distinct_group_ids, 2);
        assert_eq!(assignment.null_key_rows, 0);
    }

    #[test]
    fn test_null_domains_never_share_a_real_id() {
        let rows: Vec<Record> = (0..10)
            .map(|i| {
                Record::new(i)
                    .with(Column::CompanyName, "fresh burger")
                    .with(Column::MainCity, "conway")
            })
            .chain(std::iter::once(
                Record::new(10).with(Column::WebsiteDomain, "freshburger.com"),
            ))
            .collect();
        let (table, assignment) = assign_group_ids(RecordTable::new(rows), &domain_key());

        for record in table.iter().take(10) {
            assert_eq!(record.group_id, Some(NULL_GROUP_ID));
        }
        assert_eq!(table.get(10).and_then(|r| r.group_id), Some(0));
        assert_eq!(assignment.null_key_rows, 10);
        assert_eq!(assignment.distinct_group_ids, 1);
    }

    #[test]
    fn test_composite_key_is_null_when_any_part_is_null() {
        let key = GroupKey::new(&[Column::WebsiteDomain, Column::CompanyName]);
        let table = RecordTable::new(vec![
            Record::new(0)
                .with(Column::WebsiteDomain, "a.com")
                .with(Column::CompanyName, "alpha"),
            Record::new(1).with(Column::WebsiteDomain, "a.com"),
            Record::new(2)
                .with(Column::WebsiteDomain, "a.com")
                .with(Column::CompanyName, "beta"),
        ]);
        let (table, _) = assign_group_ids(table, &key);
        let ids: Vec<Option<i64>> = table.iter().map(|r| r.group_id).collect();
        assert_eq!(ids, vec![Some(0), Some(NULL_GROUP_ID), Some(1)]);
    }
}
