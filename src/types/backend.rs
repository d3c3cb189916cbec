use std::collections::BTreeMap;

use super::error::UnknownResourceError;
use super::{Predicate, ResourceDescriptor, Value};

/// Caller-supplied equality filters, ANDed with the compiled predicate by the
/// executor. A [`Value::List`] means "equals any of".
pub type ExtraFilters = BTreeMap<String, Value>;

/// Error raised by a [`QueryExecutor`], surfaced unchanged.
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync>;

/// Resolves a resource type name to its schema.
pub trait SchemaResolver {
    /// # Errors
    ///
    /// Returns [`UnknownResourceError`] if the name cannot be resolved.
    fn resolve(&self, resource: &str) -> Result<ResourceDescriptor, UnknownResourceError>;
}

/// Evaluates a compiled predicate against storage.
pub trait QueryExecutor {
    type Cursor;

    /// Return the records of `resource` matching `predicate` AND every extra
    /// filter.
    ///
    /// # Errors
    ///
    /// Whatever the storage layer fails with.
    fn execute(
        &self,
        resource: &ResourceDescriptor,
        predicate: &Predicate,
        filters: &ExtraFilters,
    ) -> Result<Self::Cursor, ExecutorError>;
}

impl<T: SchemaResolver + ?Sized> SchemaResolver for &T {
    fn resolve(&self, resource: &str) -> Result<ResourceDescriptor, UnknownResourceError> {
        (**self).resolve(resource)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    type Cursor = T::Cursor;

    fn execute(
        &self,
        resource: &ResourceDescriptor,
        predicate: &Predicate,
        filters: &ExtraFilters,
    ) -> Result<Self::Cursor, ExecutorError> {
        (**self).execute(resource, predicate, filters)
    }
}
