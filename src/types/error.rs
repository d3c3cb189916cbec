use thiserror::Error;

/// A condition that cannot be compiled against the resource's schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown column '{column}' on resource '{resource}'")]
    UnknownColumn { resource: String, column: String },

    #[error("unknown predicate '{token}' on column '{column}'")]
    UnknownOperator { column: String, token: String },
}

/// A resource type name the schema resolver does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource '{resource}'")]
pub struct UnknownResourceError {
    pub resource: String,
}

impl UnknownResourceError {
    #[must_use]
    pub fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_owned(),
        }
    }
}
