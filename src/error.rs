use thiserror::Error;

use crate::parse::ParseError;
use crate::{ExecutorError, SchemaError, UnknownResourceError};

/// Unified error type for running a policy filter and loading policy files.
///
/// Returned by [`PolicyFilter::run()`](crate::PolicyFilter::run) and
/// [`PolicySet::from_file()`](crate::PolicySet::from_file).
#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    UnknownResource(#[from] UnknownResourceError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("query executor failed: {0}")]
    Executor(#[source] ExecutorError),
}
