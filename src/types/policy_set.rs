use std::collections::BTreeMap;
use std::fmt;

use super::policy::Policy;

/// Policies keyed by resource type, in declaration order per resource.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(transparent))]
pub struct PolicySet {
    resources: BTreeMap<String, Vec<Policy>>,
}

impl PolicySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a policy to a resource's list.
    pub fn insert(&mut self, resource: &str, policy: Policy) {
        self.resources
            .entry(resource.to_owned())
            .or_default()
            .push(policy);
    }

    /// The policies for a resource; empty if none are registered.
    #[must_use]
    pub fn policies_for(&self, resource: &str) -> &[Policy] {
        self.resources
            .get(resource)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resource names with at least one entry, sorted.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Total number of policies across resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse the policy text format.
    ///
    /// ```
    /// use rolescope::PolicySet;
    ///
    /// let set = PolicySet::from_text(r#"
    /// policy users allow {
    ///     age > 18
    ///     status == "active"
    /// }
    /// policy users deny { region eq "EU" }
    /// "#).unwrap();
    ///
    /// assert_eq!(set.policies_for("users").len(), 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`](crate::parse::ParseError) if the input is not valid.
    pub fn from_text(input: &str) -> Result<Self, crate::parse::ParseError> {
        let parsed = crate::parse::parse(input)?;
        let mut set = PolicySet::new();
        for entry in parsed {
            set.insert(&entry.resource, entry.policy);
        }
        Ok(set)
    }

    /// Read a policy file and parse it.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`](crate::FilterError) on I/O or parse failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::FilterError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&input)?)
    }
}

impl fmt::Display for PolicySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PolicySet({} resources, {} policies)",
            self.resources.len(),
            self.len()
        )
    }
}
