// src/models/core.rs
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{DedupeError, DedupeResult};

/// Original row identifier, assigned once when the table is loaded.
pub type RowId = usize;

/// Every column of the flat company table, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    // Identity
    CompanyName,
    CompanyLegalNames,
    CompanyCommercialNames,
    CompanyType,
    // Location
    MainCountry,
    MainRegion,
    MainCityDistrict,
    MainCity,
    MainPostcode,
    MainStreet,
    MainStreetNumber,
    MainLatitude,
    MainLongitude,
    // Classification codes
    IsicV4Codes,
    SicCodes,
    NaceRev2Codes,
    Naics2022PrimaryCode,
    // Business
    MainBusinessCategory,
    MainIndustry,
    MainSector,
    BusinessModel,
    ProductType,
    // Contact / social
    PhoneNumbers,
    PrimaryEmail,
    Emails,
    WebsiteDomain,
    FacebookUrl,
    LinkedinUrl,
    InstagramUrl,
    YoutubeUrl,
    // Temporal
    CreatedAt,
    LastUpdatedAt,
}

pub const COLUMN_COUNT: usize = 32;

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::CompanyName,
        Column::CompanyLegalNames,
        Column::CompanyCommercialNames,
        Column::CompanyType,
        Column::MainCountry,
        Column::MainRegion,
        Column::MainCityDistrict,
        Column::MainCity,
        Column::MainPostcode,
        Column::MainStreet,
        Column::MainStreetNumber,
        Column::MainLatitude,
        Column::MainLongitude,
        Column::IsicV4Codes,
        Column::SicCodes,
        Column::NaceRev2Codes,
        Column::Naics2022PrimaryCode,
        Column::MainBusinessCategory,
        Column::MainIndustry,
        Column::MainSector,
        Column::BusinessModel,
        Column::ProductType,
        Column::PhoneNumbers,
        Column::PrimaryEmail,
        Column::Emails,
        Column::WebsiteDomain,
        Column::FacebookUrl,
        Column::LinkedinUrl,
        Column::InstagramUrl,
        Column::YoutubeUrl,
        Column::CreatedAt,
        Column::LastUpdatedAt,
    ];

    pub const IDENTITY: [Column; 4] = [
        Column::CompanyName,
        Column::CompanyLegalNames,
        Column::CompanyCommercialNames,
        Column::CompanyType,
    ];

    pub const CLASSIFICATION_CODES: [Column; 4] = [
        Column::IsicV4Codes,
        Column::SicCodes,
        Column::NaceRev2Codes,
        Column::Naics2022PrimaryCode,
    ];

    pub const SOCIAL_URLS: [Column; 4] = [
        Column::FacebookUrl,
        Column::LinkedinUrl,
        Column::InstagramUrl,
        Column::YoutubeUrl,
    ];

    pub const COORDINATES: [Column; 2] = [Column::MainLatitude, Column::MainLongitude];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Column::CompanyName => "company_name",
            Column::CompanyLegalNames => "company_legal_names",
            Column::CompanyCommercialNames => "company_commercial_names",
            Column::CompanyType => "company_type",
            Column::MainCountry => "main_country",
            Column::MainRegion => "main_region",
            Column::MainCityDistrict => "main_city_district",
            Column::MainCity => "main_city",
            Column::MainPostcode => "main_postcode",
            Column::MainStreet => "main_street",
            Column::MainStreetNumber => "main_street_number",
            Column::MainLatitude => "main_latitude",
            Column::MainLongitude => "main_longitude",
            Column::IsicV4Codes => "isic_v4_codes",
            Column::SicCodes => "sic_codes",
            Column::NaceRev2Codes => "nace_rev2_codes",
            Column::Naics2022PrimaryCode => "naics_2022_primary_code",
            Column::MainBusinessCategory => "main_business_category",
            Column::MainIndustry => "main_industry",
            Column::MainSector => "main_sector",
            Column::BusinessModel => "business_model",
            Column::ProductType => "product_type",
            Column::PhoneNumbers => "phone_numbers",
            Column::PrimaryEmail => "primary_email",
            Column::Emails => "emails",
            Column::WebsiteDomain => "website_domain",
            Column::FacebookUrl => "facebook_url",
            Column::LinkedinUrl => "linkedin_url",
            Column::InstagramUrl => "instagram_url",
            Column::YoutubeUrl => "youtube_url",
            Column::CreatedAt => "created_at",
            Column::LastUpdatedAt => "last_updated_at",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = DedupeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| DedupeError::MissingColumn(wanted.to_string()))
    }
}

/// One observation of a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub row_id: RowId,
    values: Vec<Option<String>>,
    pub group_id: Option<i64>,
}

impl Record {
    pub fn new(row_id: RowId) -> Self {
        Self {
            row_id,
            values: vec![None; COLUMN_COUNT],
            group_id: None,
        }
    }

    /// Builder used by loaders and tests.
    pub fn with(mut self, column: Column, value: &str) -> Self {
        self.set(column, Some(value.to_string()));
        self
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        self.values[column.index()].as_deref()
    }

    pub fn set(&mut self, column: Column, value: Option<String>) {
        self.values[column.index()] = value;
    }

    pub fn is_null(&self, column: Column) -> bool {
        self.values[column.index()].is_none()
    }

    /// Number of non-null attributes across all columns.
    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Ordered, in-memory company table. Row order is encounter order.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: Vec<Record>,
    positions: HashMap<RowId, usize>,
}

impl RecordTable {
    pub fn new(records: Vec<Record>) -> Self {
        let positions = records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.row_id, pos))
            .collect();
        Self { records, positions }
    }

    /// Row ids must be unique for lookups, selection and thinning to address
    /// the right record; reports the first repeated id.
    pub fn validate_row_ids(&self) -> DedupeResult<()> {
        if self.positions.len() == self.records.len() {
            return Ok(());
        }
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(record.row_id) {
                return Err(DedupeError::DuplicateRowId(record.row_id));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn get(&self, row_id: RowId) -> Option<&Record> {
        self.positions.get(&row_id).map(|&pos| &self.records[pos])
    }

    pub fn get_mut(&mut self, row_id: RowId) -> Option<&mut Record> {
        match self.positions.get(&row_id) {
            Some(&pos) => Some(&mut self.records[pos]),
            None => None,
        }
    }

    /// Looks up several rows at once, keeping the order of `row_ids`.
    pub fn select(&self, row_ids: &[RowId]) -> Vec<&Record> {
        row_ids.iter().filter_map(|id| self.get(*id)).collect()
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.records.iter().map(|r| r.row_id).collect()
    }

    /// Drops the given rows, preserving the order of the survivors.
    pub fn without_rows(self, discarded: &[RowId]) -> Self {
        if discarded.is_empty() {
            return self;
        }
        let drop: HashSet<RowId> = discarded.iter().copied().collect();
        Self::new(
            self.records
                .into_iter()
                .filter(|r| !drop.contains(&r.row_id))
                .collect(),
        )
    }

    /// Total non-null values held in one column.
    pub fn non_null_in(&self, column: Column) -> usize {
        self.records.iter().filter(|r| !r.is_null(column)).count()
    }
}

impl PartialEq for RecordTable {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl FromIterator<Record> for RecordTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(column.as_str().parse::<Column>().unwrap(), column);
        }
        assert_eq!(Column::ALL.len(), COLUMN_COUNT);
        assert_eq!(Column::LastUpdatedAt.index(), COLUMN_COUNT - 1);
    }

    #[test]
    fn test_unknown_column_is_missing() {
        let err = "main_zipcode".parse::<Column>().unwrap_err();
        assert!(matches!(err, DedupeError::MissingColumn(name) if name == "main_zipcode"));
    }

    #[test]
    fn test_non_null_count() {
        let record = Record::new(0)
            .with(Column::CompanyName, "acme")
            .with(Column::MainCity, "conway");
        assert_eq!(record.non_null_count(), 2);
        assert!(record.is_null(Column::WebsiteDomain));
    }

    #[test]
    fn test_repeated_row_id_is_reported() {
        let unique: RecordTable = (0..3).map(Record::new).collect();
        assert!(unique.validate_row_ids().is_ok());

        let repeated = RecordTable::new(vec![Record::new(0), Record::new(4), Record::new(0)]);
        assert!(matches!(
            repeated.validate_row_ids(),
            Err(DedupeError::DuplicateRowId(0))
        ));
    }

    #[test]
    fn test_without_rows_keeps_order_and_index() {
        let table: RecordTable = (0..5).map(Record::new).collect();
        let thinned = table.without_rows(&[1, 3]);
        assert_eq!(thinned.row_ids(), vec![0, 2, 4]);
        assert!(thinned.get(3).is_none());
        assert_eq!(thinned.get(4).map(|r| r.row_id), Some(4));
    }
}
