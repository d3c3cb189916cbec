//! Compile role-scoped authorization policies into a record filter.
//!
//! A [`PolicyFilter`] takes a resource type, the caller's [`Role`], the
//! role's [`Policy`] list and optional extra equality filters. It compiles
//! the policies into a [`Predicate`] (conditions ANDed per policy, `deny`
//! negated, policies ORed) and hands it to a [`QueryExecutor`].
//!
//! ```
//! use rolescope::memory::{MemorySchema, MemoryStore};
//! use rolescope::{column, ColumnType, Policy, PolicyFilter, Record, ResourceDescriptor};
//!
//! let schema = MemorySchema::new().with(
//!     ResourceDescriptor::new("users")
//!         .column("age", ColumnType::Integer)
//!         .column("region", ColumnType::Text),
//! );
//! let store = MemoryStore::new().with_rows(
//!     "users",
//!     vec![
//!         Record::new().set("age", 30_i64).set("region", "US"),
//!         Record::new().set("age", 30_i64).set("region", "EU"),
//!         Record::new().set("age", 15_i64).set("region", "US"),
//!     ],
//! );
//!
//! let filter = PolicyFilter::builder("users")
//!     .policy(Policy::allow(vec![column("age").gt(18_i64), column("region").not_eq("EU")]))
//!     .build();
//!
//! let rows: Vec<Record> = filter.run(&schema, &store).unwrap().collect();
//! assert_eq!(rows.len(), 1);
//! ```

mod compile;
mod error;
mod evaluate;
pub mod memory;
pub mod parse;
mod types;

pub use error::FilterError;
pub use types::{
    column, Cast, ColumnExpr, ColumnRef, ColumnType, Condition, Effect, ExecutorError,
    ExtraFilters, Operator, Policy, PolicyFilter, PolicyFilterBuilder, PolicySet, Predicate,
    QueryExecutor, Record, ResourceDescriptor, Role, SchemaError, SchemaResolver,
    UnknownResourceError, Value,
};
