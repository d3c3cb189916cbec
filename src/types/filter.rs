use std::fmt;

use tracing::debug;

use super::backend::{ExtraFilters, QueryExecutor, SchemaResolver};
use super::error::SchemaError;
use super::policy::Policy;
use super::policy_set::PolicySet;
use super::{Predicate, ResourceDescriptor, Role, Value};
use crate::FilterError;

/// Builder for a [`PolicyFilter`].
///
/// # Example
///
/// ```
/// use rolescope::{column, Policy, PolicyFilter, Role};
///
/// let filter = PolicyFilter::builder("users")
///     .role(Role::Client)
///     .policy(Policy::allow(vec![column("age").gt(18_i64)]))
///     .policy(Policy::deny(vec![column("region").eq("EU")]))
///     .extra_filter("tenant_id", 7_i64)
///     .build();
///
/// assert_eq!(filter.policies().len(), 2);
/// ```
#[derive(Debug)]
pub struct PolicyFilterBuilder {
    resource: String,
    role: Role,
    policies: Vec<Policy>,
    extra_filters: ExtraFilters,
}

impl PolicyFilterBuilder {
    /// Set the caller's role. Defaults to [`Role::Client`].
    #[must_use]
    pub fn role(mut self, role: impl Into<Role>) -> Self {
        self.role = role.into();
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }

    #[must_use]
    pub fn policies(mut self, policies: impl IntoIterator<Item = Policy>) -> Self {
        self.policies.extend(policies);
        self
    }

    /// Add the policies a [`PolicySet`] holds for this filter's resource.
    #[must_use]
    pub fn policy_set(mut self, set: &PolicySet) -> Self {
        self.policies
            .extend_from_slice(set.policies_for(&self.resource));
        self
    }

    /// Add a caller-supplied equality filter.
    #[must_use]
    pub fn extra_filter(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.extra_filters.insert(column.to_owned(), value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> PolicyFilter {
        PolicyFilter {
            resource: self.resource,
            role: self.role,
            policies: self.policies,
            extra_filters: self.extra_filters,
        }
    }
}

/// One authorization check: a resource type, the caller's role, the role's
/// policies for that resource and any extra filters.
///
/// Holds no compiled state; every [`run`](Self::run) compiles afresh.
#[derive(Debug, Clone)]
pub struct PolicyFilter {
    resource: String,
    role: Role,
    policies: Vec<Policy>,
    extra_filters: ExtraFilters,
}

impl PolicyFilter {
    #[must_use]
    pub fn builder(resource: &str) -> PolicyFilterBuilder {
        PolicyFilterBuilder {
            resource: resource.to_owned(),
            role: Role::default(),
            policies: Vec::new(),
            extra_filters: ExtraFilters::new(),
        }
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    #[must_use]
    pub fn extra_filters(&self) -> &ExtraFilters {
        &self.extra_filters
    }

    /// Compile the base predicate against a resolved descriptor, without
    /// the extra filters.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a condition names an unknown column or
    /// predicate.
    pub fn predicate(&self, descriptor: &ResourceDescriptor) -> Result<Predicate, SchemaError> {
        crate::compile::compile(&self.role, &self.policies, descriptor)
    }

    /// Resolve the resource, compile the predicate and hand both, with the
    /// extra filters, to the executor.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the resource is unknown, a condition does
    /// not compile, or the executor fails.
    pub fn run<S, E>(&self, resolver: &S, executor: &E) -> Result<E::Cursor, FilterError>
    where
        S: SchemaResolver + ?Sized,
        E: QueryExecutor + ?Sized,
    {
        let descriptor = resolver.resolve(&self.resource)?;
        let predicate = self.predicate(&descriptor)?;
        debug!(
            resource = %self.resource,
            role = %self.role,
            %predicate,
            filters = self.extra_filters.len(),
            "executing policy filter"
        );
        executor
            .execute(&descriptor, &predicate, &self.extra_filters)
            .map_err(FilterError::Executor)
    }
}

impl fmt::Display for PolicyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PolicyFilter({} as {}, {} policies, {} filters)",
            self.resource,
            self.role,
            self.policies.len(),
            self.extra_filters.len(),
        )
    }
}
