mod backend;
mod descriptor;
mod error;
mod expr;
mod filter;
mod policy;
mod policy_set;
mod record;
mod role;
mod value;

pub use backend::{ExecutorError, ExtraFilters, QueryExecutor, SchemaResolver};
pub use descriptor::{ColumnType, ResourceDescriptor};
pub use error::{SchemaError, UnknownResourceError};
pub use expr::{Cast, ColumnRef, Operator, Predicate};
pub use filter::{PolicyFilter, PolicyFilterBuilder};
pub use policy::{column, ColumnExpr, Condition, Effect, Policy};
pub use policy_set::PolicySet;
pub use record::Record;
pub use role::Role;
pub use value::Value;
