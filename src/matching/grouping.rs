// src/matching/grouping.rs - Exact-value partitioning of records on a key tuple
use std::collections::HashMap;
use std::fmt;

use crate::error::{DedupeError, DedupeResult};
use crate::models::core::{Column, Record, RecordTable, RowId};

/// Values of a record under a [`GroupKey`]. `None` components compare equal
/// to each other, so null-keyed rows still group together.
pub type KeyTuple = Vec<Option<String>>;

/// Ordered tuple of columns used to bucket candidate duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(Vec<Column>);

impl GroupKey {
    pub fn new(columns: &[Column]) -> Self {
        Self(columns.to_vec())
    }

    /// Builds a key from column names. `context` names the key in errors.
    pub fn parse<S: AsRef<str>>(names: &[S], context: &str) -> DedupeResult<Self> {
        let mut columns = Vec::new();
        let mut unknown = Vec::new();
        for name in names.iter().map(|n| n.as_ref().trim()).filter(|n| !n.is_empty()) {
            match name.parse::<Column>() {
                Ok(column) => columns.push(column),
                Err(_) => unknown.push(name.to_string()),
            }
        }

        if columns.is_empty() {
            return Err(DedupeError::EmptyGroupKey(format!(
                "{}: none of {:?} is a known column",
                context,
                names.iter().map(|n| n.as_ref()).collect::<Vec<_>>()
            )));
        }
        if let Some(first_unknown) = unknown.into_iter().next() {
            return Err(DedupeError::MissingColumn(format!(
                "{} (in {})",
                first_unknown, context
            )));
        }
        Ok(Self(columns))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn extract(&self, record: &Record) -> KeyTuple {
        self.0
            .iter()
            .map(|c| record.get(*c).map(str::to_string))
            .collect()
    }

    /// True when any component of the key is null for `record`.
    pub fn has_null(&self, record: &Record) -> bool {
        self.0.iter().any(|c| record.is_null(*c))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|c| c.as_str()).collect();
        write!(f, "({})", names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: KeyTuple,
    /// Row ids in encounter order.
    pub members: Vec<RowId>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Groups in order of first appearance of their key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    groups: Vec<Group>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn get(&self, key: &KeyTuple) -> Option<&Group> {
        self.groups.iter().find(|g| &g.key == key)
    }

    pub fn multi_member_count(&self) -> usize {
        self.groups.iter().filter(|g| g.len() > 1).count()
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

/// Buckets `records` by exact equality of their key tuple, keeping encounter
/// order both across and within groups.
pub fn partition_records<'a, I>(records: I, key: &GroupKey) -> Partition
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut index: HashMap<KeyTuple, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for record in records {
        let tuple = key.extract(record);
        match index.get(&tuple) {
            Some(&pos) => groups[pos].members.push(record.row_id),
            None => {
                index.insert(tuple.clone(), groups.len());
                groups.push(Group {
                    key: tuple,
                    members: vec![record.row_id],
                });
            }
        }
    }

    Partition { groups }
}

pub fn group_by(table: &RecordTable, key: &GroupKey) -> Partition {
    partition_records(table.iter(), key)
}
