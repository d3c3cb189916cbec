use std::collections::BTreeMap;

use super::Value;

/// A row of a resource: column name to value. Absent columns read as NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    data: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value.
    #[must_use]
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value.into());
        self
    }

    /// Set a column value (mutable reference version).
    pub fn insert(&mut self, column: &str, value: Value) {
        self.data.insert(column.to_owned(), value);
    }

    /// Look up a column. `None` means NULL.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
