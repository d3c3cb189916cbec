use std::collections::HashMap;

use super::error::SchemaError;
use super::expr::ColumnRef;
use super::value::{parse_date, parse_datetime};
use super::Value;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
    Date,
    Timestamp,
}

impl ColumnType {
    /// `Date` or `Timestamp`.
    #[must_use]
    pub fn is_temporal(self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::Timestamp)
    }

    /// Coerce a string element into this column's type. Values that are not
    /// strings, or that do not parse, are returned unchanged.
    #[must_use]
    pub fn coerce(self, value: Value) -> Value {
        let Value::String(s) = value else {
            return value;
        };
        let coerced = match self {
            ColumnType::Integer => s.parse().ok().map(Value::Int),
            ColumnType::Float => s.parse().ok().map(Value::Float),
            ColumnType::Boolean => match s.to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            ColumnType::Date => parse_date(&s).map(Value::Date),
            ColumnType::Timestamp => parse_datetime(&s)
                .map(Value::DateTime)
                .or_else(|| parse_date(&s).map(Value::Date)),
            ColumnType::Text => None,
        };
        coerced.unwrap_or(Value::String(s))
    }
}

/// Schema metadata for one resource type: its table and typed column set.
///
/// Produced by a [`SchemaResolver`](crate::SchemaResolver) and borrowed by the
/// compiler to validate columns and build column references.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    resource: String,
    table: String,
    columns: Vec<(String, ColumnType)>,
    index: HashMap<String, usize>,
}

impl ResourceDescriptor {
    /// A descriptor whose table is named after the resource.
    #[must_use]
    pub fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_owned(),
            table: resource.to_owned(),
            columns: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[must_use]
    pub fn table_name(mut self, table: &str) -> Self {
        table.clone_into(&mut self.table);
        self
    }

    /// Register a column. Registering an existing name replaces its type.
    #[must_use]
    pub fn column(mut self, name: &str, column_type: ColumnType) -> Self {
        if let Some(&idx) = self.index.get(name) {
            self.columns[idx].1 = column_type;
        } else {
            self.index.insert(name.to_owned(), self.columns.len());
            self.columns.push((name.to_owned(), column_type));
        }
        self
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.index.get(name).map(|&idx| self.columns[idx].1)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Reference to a column of this resource's table.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownColumn`] if the column does not exist.
    pub fn column_ref(&self, name: &str) -> Result<ColumnRef, SchemaError> {
        if self.contains(name) {
            Ok(ColumnRef::new(&self.table, name))
        } else {
            Err(SchemaError::UnknownColumn {
                resource: self.resource.clone(),
                column: name.to_owned(),
            })
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in registration order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn users() -> ResourceDescriptor {
        ResourceDescriptor::new("users")
            .column("age", ColumnType::Integer)
            .column("status", ColumnType::Text)
    }

    #[test]
    fn register_and_lookup() {
        let desc = users();
        assert_eq!(desc.column_type("age"), Some(ColumnType::Integer));
        assert!(desc.contains("status"));
        assert_eq!(desc.len(), 2);
    }

    #[test]
    fn missing_column() {
        let desc = users();
        assert_eq!(desc.column_type("nonexistent"), None);
        assert!(matches!(
            desc.column_ref("nonexistent"),
            Err(SchemaError::UnknownColumn { resource, column })
                if resource == "users" && column == "nonexistent"
        ));
    }

    #[test]
    fn duplicate_column_replaces_type() {
        let desc = users().column("age", ColumnType::Float);
        assert_eq!(desc.len(), 2);
        assert_eq!(desc.column_type("age"), Some(ColumnType::Float));
    }

    #[test]
    fn columns_keep_registration_order() {
        let binding = users();
        let names: Vec<&str> = binding.columns().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["age", "status"]);
    }

    #[test]
    fn table_defaults_to_resource_name() {
        assert_eq!(users().table(), "users");
        let desc = ResourceDescriptor::new("User").table_name("app_users");
        assert_eq!(desc.resource(), "User");
        assert_eq!(desc.table(), "app_users");
    }

    #[test]
    fn column_ref_uses_table() {
        let desc = users().table_name("app_users");
        assert_eq!(desc.column_ref("age").unwrap().to_string(), "app_users.age");
    }

    #[test]
    fn empty_descriptor() {
        let desc = ResourceDescriptor::new("empty");
        assert!(desc.is_empty());
    }

    #[test]
    fn coerce_by_column_type() {
        assert_eq!(ColumnType::Integer.coerce("42".into()), Value::Int(42));
        assert_eq!(ColumnType::Float.coerce("1.5".into()), Value::Float(1.5));
        assert_eq!(ColumnType::Boolean.coerce("TRUE".into()), Value::Bool(true));
        assert_eq!(
            ColumnType::Date.coerce("2021-09-01".into()),
            Value::Date(NaiveDate::from_ymd_opt(2021, 9, 1).unwrap())
        );
        assert_eq!(ColumnType::Text.coerce("42".into()), Value::String("42".into()));
    }

    #[test]
    fn coerce_failure_keeps_string() {
        assert_eq!(ColumnType::Integer.coerce("abc".into()), Value::String("abc".into()));
        assert_eq!(ColumnType::Integer.coerce(Value::Int(7)), Value::Int(7));
    }
}
