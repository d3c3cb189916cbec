use std::fmt;

use super::expr::Operator;
use super::Value;

/// Whether a policy grants or withholds the records its conditions match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

impl Effect {
    /// Only the exact token `"deny"` denies; every other token allows.
    #[must_use]
    pub fn from_token(token: &str) -> Effect {
        if token == "deny" {
            Effect::Deny
        } else {
            Effect::Allow
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Effect::Allow => "allow",
            Effect::Deny => "deny",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single column constraint as received: the predicate token is kept raw
/// and resolved to an [`Operator`] when the policy is compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub predicate: String,
    pub value: Value,
}

impl Condition {
    #[must_use]
    pub fn new(column: &str, predicate: &str, value: impl Into<Value>) -> Self {
        Self {
            column: column.to_owned(),
            predicate: predicate.to_owned(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.predicate, self.value)
    }
}

/// An authorization rule for one resource type: an effect applied to the
/// conjunction of its conditions. No conditions means the policy matches
/// every record.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Policy {
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Vec<Condition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: Effect,
}

impl Policy {
    #[must_use]
    pub fn new(effect: Effect, conditions: Vec<Condition>) -> Self {
        Self { conditions, effect }
    }

    #[must_use]
    pub fn allow(conditions: Vec<Condition>) -> Self {
        Self::new(Effect::Allow, conditions)
    }

    #[must_use]
    pub fn deny(conditions: Vec<Condition>) -> Self {
        Self::new(Effect::Deny, conditions)
    }
}

/// Intermediate builder for conditions.
/// Created by [`column()`]; a comparison method produces the [`Condition`].
#[derive(Debug, Clone)]
pub struct ColumnExpr {
    name: String,
}

impl ColumnExpr {
    #[must_use]
    pub fn op(self, op: Operator, value: impl Into<Value>) -> Condition {
        Condition {
            column: self.name,
            predicate: op.token().to_owned(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Condition {
        self.op(Operator::Eq, value)
    }

    #[must_use]
    pub fn not_eq(self, value: impl Into<Value>) -> Condition {
        self.op(Operator::NotEq, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Condition {
        self.op(Operator::Gt, value)
    }

    #[must_use]
    pub fn gteq(self, value: impl Into<Value>) -> Condition {
        self.op(Operator::Gteq, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Condition {
        self.op(Operator::Lt, value)
    }

    #[must_use]
    pub fn lteq(self, value: impl Into<Value>) -> Condition {
        self.op(Operator::Lteq, value)
    }

    /// `in` membership. Accepts a list or a `,`/`;` delimited string.
    #[must_use]
    pub fn is_in(self, values: impl Into<Value>) -> Condition {
        self.op(Operator::In, values)
    }

    #[must_use]
    pub fn not_in(self, values: impl Into<Value>) -> Condition {
        self.op(Operator::NotIn, values)
    }

    #[must_use]
    pub fn eq_any(self, values: impl Into<Value>) -> Condition {
        self.op(Operator::EqAny, values)
    }

    /// Case-insensitive `LIKE` pattern.
    #[must_use]
    pub fn matches(self, pattern: &str) -> Condition {
        self.op(Operator::Matches, pattern)
    }

    #[must_use]
    pub fn does_not_match(self, pattern: &str) -> Condition {
        self.op(Operator::DoesNotMatch, pattern)
    }
}

#[must_use]
pub fn column(name: &str) -> ColumnExpr {
    ColumnExpr {
        name: name.to_owned(),
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    use super::{Condition, Effect, Value};

    /// Conditions are `[column, predicate, value]` triples.
    impl<'de> Deserialize<'de> for Condition {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let (column, predicate, value) = <(String, String, Value)>::deserialize(deserializer)?;
            Ok(Condition {
                column,
                predicate,
                value,
            })
        }
    }

    /// Any effect value is accepted; only a string can name `deny`.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum EffectRepr {
        Token(String),
        Other(IgnoredAny),
    }

    impl<'de> Deserialize<'de> for Effect {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(match Option::<EffectRepr>::deserialize(deserializer)? {
                Some(EffectRepr::Token(token)) => Effect::from_token(&token),
                Some(EffectRepr::Other(_)) | None => Effect::Allow,
            })
        }
    }
}
