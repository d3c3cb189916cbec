use std::fmt;
use std::ops::Not;

use super::{Record, Value};

/// Comparison operators a condition may name.
///
/// Each operator has a word token (`gteq`) and some have a symbol alias
/// (`>=`). Tokens outside this table are rejected at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Gteq,
    Lt,
    Lteq,
    In,
    NotIn,
    EqAny,
    Matches,
    DoesNotMatch,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Gt,
        Operator::Gteq,
        Operator::Lt,
        Operator::Lteq,
        Operator::In,
        Operator::NotIn,
        Operator::EqAny,
        Operator::Matches,
        Operator::DoesNotMatch,
    ];

    /// Resolve a predicate token (word or symbol) to an operator.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Operator> {
        let op = match token {
            "eq" | "==" => Operator::Eq,
            "not_eq" | "!=" => Operator::NotEq,
            "gt" | ">" => Operator::Gt,
            "gteq" | ">=" => Operator::Gteq,
            "lt" | "<" => Operator::Lt,
            "lteq" | "<=" => Operator::Lteq,
            "in" => Operator::In,
            "not_in" => Operator::NotIn,
            "eq_any" => Operator::EqAny,
            "matches" => Operator::Matches,
            "does_not_match" => Operator::DoesNotMatch,
            _ => return None,
        };
        Some(op)
    }

    /// The canonical word token.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::NotEq => "not_eq",
            Operator::Gt => "gt",
            Operator::Gteq => "gteq",
            Operator::Lt => "lt",
            Operator::Lteq => "lteq",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::EqAny => "eq_any",
            Operator::Matches => "matches",
            Operator::DoesNotMatch => "does_not_match",
        }
    }

    /// Membership operators take a list of values.
    #[must_use]
    pub fn is_membership(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn | Operator::EqAny)
    }

    fn sql(self) -> &'static str {
        match self {
            Operator::Eq | Operator::EqAny => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Gteq => ">=",
            Operator::Lt => "<",
            Operator::Lteq => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Matches => "ILIKE",
            Operator::DoesNotMatch => "NOT ILIKE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Type a column reference is cast to before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    Date,
}

/// A column of a resource's table, optionally wrapped in a cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    table: String,
    name: String,
    cast: Option<Cast>,
}

impl ColumnRef {
    #[must_use]
    pub fn new(table: &str, name: &str) -> Self {
        Self {
            table: table.to_owned(),
            name: name.to_owned(),
            cast: None,
        }
    }

    #[must_use]
    pub fn cast(mut self, cast: Cast) -> Self {
        self.cast = Some(cast);
        self
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn cast_to(&self) -> Option<Cast> {
        self.cast
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cast {
            Some(Cast::Date) => write!(f, "CAST({}.{} AS DATE)", self.table, self.name),
            None => write!(f, "{}.{}", self.table, self.name),
        }
    }
}

/// A compiled boolean filter over the records of one resource.
///
/// Every node owns its children. `All` and `Nothing` are the trivial
/// predicates produced by the admin bypass and the client deny-all guard;
/// `AlwaysTrue` marks a policy without conditions and is dropped from the
/// cross-policy union.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    All,
    Nothing,
    AlwaysTrue,
    Compare {
        column: ColumnRef,
        op: Operator,
        value: Value,
    },
    Membership {
        column: ColumnRef,
        op: Operator,
        values: Vec<Value>,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Grouping(Box<Predicate>),
}

impl Predicate {
    #[must_use]
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Wrap in explicit parentheses.
    #[must_use]
    pub fn group(self) -> Predicate {
        Predicate::Grouping(Box::new(self))
    }

    #[must_use]
    pub fn is_always_true(&self) -> bool {
        matches!(self, Predicate::AlwaysTrue)
    }

    /// Evaluate against a record with SQL three-valued logic.
    /// `None` means UNKNOWN (e.g. a comparison against NULL).
    #[must_use]
    pub fn evaluate(&self, record: &Record) -> Option<bool> {
        crate::evaluate::evaluate(self, record)
    }

    /// Whether the record passes this filter, i.e. evaluates to TRUE.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.evaluate(record) == Some(true)
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }
}

/// Renders the predicate as a SQL `WHERE` fragment.
impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::All => f.write_str("1=1"),
            Predicate::Nothing => f.write_str("1=0"),
            Predicate::AlwaysTrue => f.write_str("TRUE"),
            Predicate::Compare { column, op, value } => {
                write!(f, "{column} {} {value}", op.sql())
            }
            Predicate::Membership { column, op, values } => {
                if values.is_empty() {
                    let keyword = if *op == Operator::NotIn { "NOT IN" } else { "IN" };
                    return write!(f, "{column} {keyword} (NULL)");
                }
                if *op == Operator::EqAny {
                    write!(f, "(")?;
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            write!(f, " OR ")?;
                        }
                        write!(f, "{column} = {value}")?;
                    }
                    return write!(f, ")");
                }
                let list = Value::List(values.clone());
                write!(f, "{column} {} {list}", op.sql())
            }
            Predicate::And(a, b) => {
                write_and_operand(f, a)?;
                write!(f, " AND ")?;
                write_and_operand(f, b)
            }
            Predicate::Or(a, b) => write!(f, "{a} OR {b}"),
            Predicate::Not(inner) => match inner.as_ref() {
                Predicate::Grouping(_) => write!(f, "NOT {inner}"),
                _ => write!(f, "NOT ({inner})"),
            },
            Predicate::Grouping(inner) => write!(f, "({inner})"),
        }
    }
}

fn write_and_operand(f: &mut fmt::Formatter<'_>, operand: &Predicate) -> fmt::Result {
    match operand {
        Predicate::Or(..) => write!(f, "({operand})"),
        _ => write!(f, "{operand}"),
    }
}
