use std::cmp::Ordering;

use crate::{Cast, ColumnRef, Operator, Predicate, Record, Value};

/// Three-valued evaluation: `None` is SQL's UNKNOWN.
pub(crate) fn evaluate(predicate: &Predicate, record: &Record) -> Option<bool> {
    match predicate {
        Predicate::All | Predicate::AlwaysTrue => Some(true),
        Predicate::Nothing => Some(false),
        Predicate::Compare { column, op, value } => {
            let actual = read_column(column, record)?;
            match value {
                Value::List(items) if op.is_membership() => membership(*op, &actual, items),
                _ => compare(*op, &actual, value),
            }
        }
        Predicate::Membership { column, op, values } => {
            let actual = read_column(column, record)?;
            membership(*op, &actual, values)
        }
        Predicate::And(a, b) => match evaluate(a, record) {
            Some(false) => Some(false),
            left => match (left, evaluate(b, record)) {
                (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
        },
        Predicate::Or(a, b) => match evaluate(a, record) {
            Some(true) => Some(true),
            left => match (left, evaluate(b, record)) {
                (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
        },
        Predicate::Not(inner) => evaluate(inner, record).map(|b| !b),
        Predicate::Grouping(inner) => evaluate(inner, record),
    }
}

fn read_column(column: &ColumnRef, record: &Record) -> Option<Value> {
    let value = record.get(column.name())?;
    match column.cast_to() {
        Some(Cast::Date) => value.to_date().map(Value::Date),
        None => Some(value.clone()),
    }
}

fn compare(op: Operator, actual: &Value, expected: &Value) -> Option<bool> {
    match op {
        Operator::Matches => like(actual, expected),
        Operator::DoesNotMatch => like(actual, expected).map(|b| !b),
        Operator::In | Operator::NotIn | Operator::EqAny => None,
        _ => {
            let ord = actual.partial_cmp_value(expected)?;
            Some(match op {
                Operator::Eq => ord == Ordering::Equal,
                Operator::NotEq => ord != Ordering::Equal,
                Operator::Gt => ord == Ordering::Greater,
                Operator::Gteq => ord != Ordering::Less,
                Operator::Lt => ord == Ordering::Less,
                _ => ord != Ordering::Greater,
            })
        }
    }
}

/// `x IN (a, b)` is `x = a OR x = b`; an empty list is UNKNOWN so that the
/// leaf can never be satisfied, negated or not.
fn membership(op: Operator, actual: &Value, items: &[Value]) -> Option<bool> {
    if items.is_empty() {
        return None;
    }
    let mut found = Some(false);
    for item in items {
        match compare(Operator::Eq, actual, item) {
            Some(true) => {
                found = Some(true);
                break;
            }
            Some(false) => {}
            None => found = None,
        }
    }
    match op {
        Operator::NotIn => found.map(|b| !b),
        _ => found,
    }
}

fn like(actual: &Value, pattern: &Value) -> Option<bool> {
    let text = actual.as_str()?.to_lowercase();
    let pattern = pattern.as_str()?.to_lowercase();
    Some(like_match(&text, &pattern))
}

/// `%` matches any run of characters, `_` exactly one.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let (mut ti, mut pi) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < text.len() {
        if pi < pattern.len() && (pattern[pi] == '_' || pattern[pi] == text[ti]) {
            ti += 1;
            pi += 1;
        } else if pi < pattern.len() && pattern[pi] == '%' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if let Some((star, from)) = backtrack {
            pi = star + 1;
            ti = from + 1;
            backtrack = Some((star, from + 1));
        } else {
            return false;
        }
    }
    pattern[pi..].iter().all(|&c| c == '%')
}
