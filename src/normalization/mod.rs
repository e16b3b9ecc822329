// src/normalization/mod.rs - Field canonicalization applied once before the tiers run
pub mod address;
pub mod codes;
pub mod name;
pub mod url;

use log::{debug, warn};

use crate::error::{DedupeError, DedupeResult};
use crate::models::core::{Column, Record, RecordTable};

pub use name::LegalSuffixStripper;

/// Produces a normalized copy of `table`. Row count and order are preserved and
/// the input is never mutated.
///
/// Every malformed coordinate is logged; the first one is returned as the error.
pub fn normalize_table(
    table: &RecordTable,
    suffixes: &LegalSuffixStripper,
) -> DedupeResult<RecordTable> {
    let mut malformed: Vec<DedupeError> = Vec::new();
    let mut normalized = Vec::with_capacity(table.len());

    for record in table.iter() {
        match normalize_record(record, suffixes) {
            Ok(r) => normalized.push(r),
            Err(errors) => {
                for e in &errors {
                    warn!("Normalization: {}", e);
                }
                malformed.extend(errors);
            }
        }
    }

    if !malformed.is_empty() {
        warn!(
            "Normalization: {} malformed coordinate value(s), aborting before any tier runs",
            malformed.len()
        );
        return Err(malformed.remove(0));
    }

    debug!("Normalization: {} records normalized", normalized.len());
    Ok(RecordTable::new(normalized))
}

fn normalize_record(
    record: &Record,
    suffixes: &LegalSuffixStripper,
) -> Result<Record, Vec<DedupeError>> {
    let mut out = record.clone();
    let mut errors = Vec::new();

    for column in Column::IDENTITY {
        if let Some(raw) = record.get(column) {
            out.set(column, Some(suffixes.normalize_identity(raw)));
        }
    }

    if let Some(raw) = record.get(Column::MainPostcode) {
        out.set(
            Column::MainPostcode,
            Some(address::normalize_postcode(raw)),
        );
    }

    for column in Column::COORDINATES {
        if let Some(raw) = record.get(column) {
            match address::round_coordinate(raw) {
                Some(value) => out.set(column, Some(value.to_string())),
                None => errors.push(DedupeError::MalformedNumber {
                    row_id: record.row_id,
                    column,
                    raw: raw.to_string(),
                }),
            }
        }
    }

    for column in Column::CLASSIFICATION_CODES {
        if let Some(raw) = record.get(column) {
            out.set(column, codes::normalize_code_list(raw));
        }
    }

    for column in Column::SOCIAL_URLS {
        if let Some(raw) = record.get(column) {
            out.set(column, Some(url::normalize_social_url(raw)));
        }
    }

    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stripper() -> LegalSuffixStripper {
        LegalSuffixStripper::with_defaults().unwrap()
    }

    #[test]
    fn test_normalize_table_canonicalizes_every_field_class() {
        let table = RecordTable::new(vec![Record::new(0)
            .with(Column::CompanyName, " Fresh Burger LLC")
            .with(Column::CompanyLegalNames, "FRESH BURGER INC.")
            .with(Column::MainPostcode, "SC-29526")
            .with(Column::MainLatitude, "33.8361")
            .with(Column::MainLongitude, "-79.0478")
            .with(Column::SicCodes, "5813|5812|5812")
            .with(Column::FacebookUrl, "https://www.facebook.com/FreshBurger")
            .with(Column::MainCity, "Conway")]);

        let normalized = normalize_table(&table, &stripper()).unwrap();
        let r = &normalized.records()[0];
        assert_eq!(r.get(Column::CompanyName), Some("fresh burger"));
        assert_eq!(r.get(Column::CompanyLegalNames), Some("fresh burger"));
        assert_eq!(r.get(Column::MainPostcode), Some("29526"));
        assert_eq!(r.get(Column::MainLatitude), Some("33.84"));
        assert_eq!(r.get(Column::MainLongitude), Some("-79.05"));
        assert_eq!(r.get(Column::SicCodes), Some("5812, 5813"));
        assert_eq!(r.get(Column::FacebookUrl), Some("facebook.com/freshburger"));
        // untouched columns keep their raw value
        assert_eq!(r.get(Column::MainCity), Some("Conway"));
    }

    #[test]
    fn test_nulls_pass_through_and_input_is_not_mutated() {
        let table = RecordTable::new(vec![
            Record::new(0).with(Column::CompanyName, "Acme Ltd"),
            Record::new(1),
        ]);
        let normalized = normalize_table(&table, &stripper()).unwrap();

        assert_eq!(normalized.len(), 2);
        assert_eq!(table.records()[0].get(Column::CompanyName), Some("Acme Ltd"));
        assert_eq!(normalized.records()[1], Record::new(1));
        assert!(normalized.records()[0].is_null(Column::MainLatitude));
    }

    #[test]
    fn test_malformed_coordinate_fails_loudly() {
        let table = RecordTable::new(vec![
            Record::new(0).with(Column::MainLatitude, "12.5"),
            Record::new(7).with(Column::MainLongitude, "east-ish"),
        ]);
        let err = normalize_table(&table, &stripper()).unwrap_err();
        match err {
            DedupeError::MalformedNumber {
                row_id,
                column,
                raw,
            } => {
                assert_eq!(row_id, 7);
                assert_eq!(column, Column::MainLongitude);
                assert_eq!(raw, "east-ish");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_huge_coordinate_is_rejected_instead_of_written_as_inf() {
        let table = RecordTable::new(vec![Record::new(0).with(Column::MainLatitude, "1.7e308")]);
        let err = normalize_table(&table, &stripper()).unwrap_err();
        assert!(matches!(
            err,
            DedupeError::MalformedNumber { row_id: 0, column: Column::MainLatitude, .. }
        ));
    }

    #[test]
    fn test_normalization_is_a_fixpoint() {
        let table = RecordTable::new(vec![Record::new(0)
            .with(Column::CompanyName, "Owens Liquors Inc Ltd")
            .with(Column::NaceRev2Codes, "56.10|47.25")
            .with(Column::MainLatitude, "33.689")
            .with(Column::LinkedinUrl, "http://LinkedIn.com/company/owens")]);
        let once = normalize_table(&table, &stripper()).unwrap();
        let twice = normalize_table(&once, &stripper()).unwrap();
        assert_eq!(once, twice);
    }
}
