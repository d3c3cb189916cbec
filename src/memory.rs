//! In-memory [`SchemaResolver`] and [`QueryExecutor`].
//!
//! `MemoryStore` evaluates predicates with [`Predicate::matches`], so it
//! doubles as a reference for how a storage backend should treat the
//! compiled tree.

use std::collections::HashMap;

use tracing::trace;

use crate::{
    ExecutorError, ExtraFilters, Operator, Predicate, QueryExecutor, Record, ResourceDescriptor,
    SchemaError, SchemaResolver, UnknownResourceError, Value,
};

/// Descriptors registered by resource name.
#[derive(Debug, Clone, Default)]
pub struct MemorySchema {
    descriptors: HashMap<String, ResourceDescriptor>,
}

impl MemorySchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, descriptor: ResourceDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn insert(&mut self, descriptor: ResourceDescriptor) {
        self.descriptors
            .insert(descriptor.resource().to_owned(), descriptor);
    }
}

impl SchemaResolver for MemorySchema {
    fn resolve(&self, resource: &str) -> Result<ResourceDescriptor, UnknownResourceError> {
        self.descriptors
            .get(resource)
            .cloned()
            .ok_or_else(|| UnknownResourceError::new(resource))
    }
}

/// Rows keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<Record>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rows to a table.
    #[must_use]
    pub fn with_rows(mut self, table: &str, rows: impl IntoIterator<Item = Record>) -> Self {
        self.tables.entry(table.to_owned()).or_default().extend(rows);
        self
    }

    pub fn insert(&mut self, table: &str, row: Record) {
        self.tables.entry(table.to_owned()).or_default().push(row);
    }
}

impl QueryExecutor for MemoryStore {
    type Cursor = RecordCursor;

    fn execute(
        &self,
        resource: &ResourceDescriptor,
        predicate: &Predicate,
        filters: &ExtraFilters,
    ) -> Result<RecordCursor, ExecutorError> {
        if matches!(predicate, Predicate::Nothing) {
            return Ok(RecordCursor::default());
        }
        let merged = match filter_predicate(resource, filters)? {
            Some(extra) => predicate.clone().and(extra),
            None => predicate.clone(),
        };
        trace!(table = resource.table(), predicate = %merged, "scanning table");

        let rows: Vec<Record> = self
            .tables
            .get(resource.table())
            .map(|rows| {
                rows.iter()
                    .filter(|row| merged.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(RecordCursor::new(rows))
    }
}

/// Equality filters as a conjunction; lists become `IN`.
fn filter_predicate(
    resource: &ResourceDescriptor,
    filters: &ExtraFilters,
) -> Result<Option<Predicate>, SchemaError> {
    let mut merged: Option<Predicate> = None;
    for (name, value) in filters {
        let column = resource.column_ref(name)?;
        let leaf = match value {
            Value::List(values) => Predicate::Membership {
                column,
                op: Operator::In,
                values: values.clone(),
            },
            value => Predicate::Compare {
                column,
                op: Operator::Eq,
                value: value.clone(),
            },
        };
        merged = Some(match merged {
            Some(acc) => acc.and(leaf),
            None => leaf,
        });
    }
    Ok(merged)
}

/// Records returned by [`MemoryStore`].
#[derive(Debug, Default)]
pub struct RecordCursor {
    rows: std::vec::IntoIter<Record>,
}

impl RecordCursor {
    fn new(rows: Vec<Record>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl Iterator for RecordCursor {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for RecordCursor {}
