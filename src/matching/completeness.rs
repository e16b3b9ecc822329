// src/matching/completeness.rs - Master selection and value migration inside one merge unit
use crate::models::core::{Column, Record, RecordTable, RowId};

/// What to do with one group of duplicates: keep `master`, fill its null
/// columns from `backfill`, drop `discarded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub master: RowId,
    pub discarded: Vec<RowId>,
    pub backfill: Vec<(Column, String)>,
}

/// Picks the most complete record (ties go to the lowest row id) and collects,
/// for every column the master lacks, the first non-null value among the other
/// members in ascending row-id order.
///
/// Single-member groups resolve to themselves with nothing to discard or fill.
pub fn resolve_group(members: &[&Record]) -> Resolution {
    assert!(!members.is_empty(), "merge units are never empty");

    let mut ordered: Vec<&Record> = members.to_vec();
    ordered.sort_by_key(|r| r.row_id);

    let mut master = ordered[0];
    for &candidate in &ordered[1..] {
        if candidate.non_null_count() > master.non_null_count() {
            master = candidate;
        }
    }

    let discarded: Vec<RowId> = ordered
        .iter()
        .map(|r| r.row_id)
        .filter(|id| *id != master.row_id)
        .collect();

    let backfill = Column::ALL
        .iter()
        .filter(|column| master.is_null(**column))
        .filter_map(|column| {
            ordered
                .iter()
                .filter(|r| r.row_id != master.row_id)
                .find_map(|r| r.get(*column))
                .map(|value| (*column, value.to_string()))
        })
        .collect();

    Resolution {
        master: master.row_id,
        discarded,
        backfill,
    }
}

/// Writes the back-filled values into the master row. Discarded rows are
/// removed by the caller once the whole tier has been resolved.
pub fn apply_backfill(table: &mut RecordTable, resolution: &Resolution) -> usize {
    match table.get_mut(resolution.master) {
        Some(master) => {
            for (column, value) in &resolution.backfill {
                master.set(*column, Some(value.clone()));
            }
            resolution.backfill.len()
        }
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_burger_rows() -> Vec<Record> {
        vec![
            Record::new(10)
                .with(Column::CompanyName, "fresh burger")
                .with(Column::MainCity, "conway"),
            Record::new(11)
                .with(Column::CompanyName, "fresh burger")
                .with(Column::MainCity, "conway")
                .with(Column::SicCodes, "5812")
                .with(Column::MainPostcode, "29526"),
            Record::new(12)
                .with(Column::CompanyName, "fresh burger")
                .with(Column::MainPostcode, "29527")
                .with(Column::MainStreet, "church st")
                .with(Column::PhoneNumbers, "+18435550100"),
        ]
    }

    #[test]
    fn test_most_complete_record_wins() {
        let rows = fresh_burger_rows();
        let refs: Vec<&Record> = rows.iter().collect();
        let resolution = resolve_group(&refs);
        // rows 11 and 12 both have four values; the lower id wins the tie
        assert_eq!(resolution.master, 11);
        assert_eq!(resolution.discarded, vec![10, 12]);
    }

    #[test]
    fn test_backfill_takes_first_non_null_by_row_id() {
        let rows = fresh_burger_rows();
        let refs: Vec<&Record> = rows.iter().rev().collect();
        let resolution = resolve_group(&refs);
        assert_eq!(
            resolution.backfill,
            vec![
                (Column::MainStreet, "church st".to_string()),
                (Column::PhoneNumbers, "+18435550100".to_string()),
            ]
        );
        // master's own postcode is never overwritten
        assert!(!resolution
            .backfill
            .iter()
            .any(|(c, _)| *c == Column::MainPostcode));
    }

    #[test]
    fn test_single_member_group_is_untouched() {
        let rows = fresh_burger_rows();
        let resolution = resolve_group(&[&rows[0]]);
        assert_eq!(resolution.master, 10);
        assert!(resolution.discarded.is_empty());
        assert!(resolution.backfill.is_empty());
    }

    #[test]
    fn test_merge_keeps_every_populated_column() {
        let mut table = RecordTable::new(fresh_burger_rows());
        let resolution = resolve_group(&table.select(&[10, 11, 12]));
        let filled = apply_backfill(&mut table, &resolution);
        assert_eq!(filled, 2);

        let before: Vec<(Column, usize)> = Column::ALL
            .iter()
            .map(|c| (*c, table.non_null_in(*c)))
            .collect();
        let thinned = table.without_rows(&resolution.discarded);
        assert_eq!(thinned.len(), 1);

        let master = thinned.get(11).unwrap();
        for (column, count) in before {
            assert_eq!(count > 0, !master.is_null(column), "column {column}");
        }
    }
}
