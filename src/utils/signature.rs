// src/utils/signature.rs
use sha2::{Digest, Sha256};

use crate::models::core::{Column, RecordTable};

/// SHA-256 over every row (row id, each column, group id) in table order.
/// Identical tables always hash identically; used to confirm a re-run found
/// nothing further to merge.
pub fn table_signature(table: &RecordTable) -> String {
    let mut hasher = Sha256::new();
    for record in table.iter() {
        hasher.update(record.row_id.to_le_bytes());
        for column in Column::ALL {
            match record.get(column) {
                Some(value) => {
                    hasher.update([1u8]);
                    hasher.update((value.len() as u64).to_le_bytes());
                    hasher.update(value.as_bytes());
                }
                None => hasher.update([0u8]),
            }
        }
        match record.group_id {
            Some(id) => {
                hasher.update([1u8]);
                hasher.update(id.to_le_bytes());
            }
            None => hasher.update([0u8]),
        }
    }
    hex::encode(hasher.finalize())
}
