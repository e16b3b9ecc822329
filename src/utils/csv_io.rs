// src/utils/csv_io.rs - Flat company table import/export
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{DedupeError, DedupeResult};
use crate::models::core::{Column, Record, RecordTable};

pub const GROUP_ID_HEADER: &str = "group_id";

/// Reads a delimited table with a header row. Every schema column must be
/// present; extra columns are ignored and blank cells become null. Row ids are
/// the 0-based index of each data line.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> DedupeResult<RecordTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: HashMap<String, usize> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_string(), i))
        .collect();

    let missing: Vec<&str> = Column::ALL
        .iter()
        .map(|c| c.as_str())
        .filter(|name| !headers.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(DedupeError::MissingColumn(missing.join(", ")));
    }

    let column_positions: Vec<(Column, usize)> = Column::ALL
        .iter()
        .filter_map(|c| headers.get(c.as_str()).map(|pos| (*c, *pos)))
        .collect();
    let group_id_position = headers.get(GROUP_ID_HEADER).copied();

    let mut records = Vec::new();
    for (row_id, row) in csv_reader.records().enumerate() {
        let row = row?;
        let mut record = Record::new(row_id);
        for (column, pos) in &column_positions {
            let value = row.get(*pos).filter(|v| !v.trim().is_empty());
            record.set(*column, value.map(str::to_string));
        }
        record.group_id = group_id_position
            .and_then(|pos| row.get(pos))
            .and_then(|v| v.trim().parse().ok());
        records.push(record);
    }

    debug!("Read {} records with {} columns", records.len(), headers.len());
    Ok(RecordTable::new(records))
}

pub fn read_table_from_path(path: &Path, delimiter: u8) -> DedupeResult<RecordTable> {
    let file = File::open(path)?;
    let table = read_table(file, delimiter)?;
    info!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

/// Writes every schema column followed by `group_id`. Nulls become empty cells.
///
/// A delimited file has one spelling for "no value", so an empty-string value
/// (a postcode with no digits) is written exactly like a null and reads back as
/// null. Reloading a written table can therefore lower its non-null counts.
pub fn write_table<W: Write>(table: &RecordTable, writer: W, delimiter: u8) -> DedupeResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let mut header: Vec<&str> = Column::ALL.iter().map(|c| c.as_str()).collect();
    header.push(GROUP_ID_HEADER);
    csv_writer.write_record(&header)?;

    for record in table.iter() {
        let mut row: Vec<String> = Column::ALL
            .iter()
            .map(|c| record.get(*c).unwrap_or_default().to_string())
            .collect();
        row.push(record.group_id.map(|id| id.to_string()).unwrap_or_default());
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_table_to_path(table: &RecordTable, path: &Path, delimiter: u8) -> DedupeResult<()> {
    let file = File::create(path)?;
    write_table(table, file, delimiter)?;
    info!("Wrote {} resolved records to {}", table.len(), path.display());
    Ok(())
}
