use tracing::{debug, trace};

use crate::{
    Cast, ColumnRef, Condition, Effect, Operator, Policy, Predicate, ResourceDescriptor, Role,
    SchemaError, Value,
};

/// Compile a role's policies for one resource into the base predicate.
pub(crate) fn compile(
    role: &Role,
    policies: &[Policy],
    descriptor: &ResourceDescriptor,
) -> Result<Predicate, SchemaError> {
    match role {
        Role::Admin => {
            debug!(resource = descriptor.resource(), "admin role bypasses policies");
            return Ok(Predicate::All);
        }
        Role::Client if policies.is_empty() => {
            debug!(resource = descriptor.resource(), "client role has no policies, denying all");
            return Ok(Predicate::Nothing);
        }
        Role::Client | Role::Other(_) => {}
    }

    let mut union: Option<Predicate> = None;
    for (index, policy) in policies.iter().enumerate() {
        let compiled = compile_policy(policy, descriptor)?;
        if compiled.is_always_true() {
            debug!(index, "dropping unconditioned policy from union");
            continue;
        }
        trace!(index, predicate = %compiled, "compiled policy");
        union = Some(match union {
            Some(acc) => acc.or(compiled),
            None => compiled,
        });
    }

    // An empty union places no restriction.
    Ok(union.unwrap_or(Predicate::All))
}

pub(crate) fn compile_policy(
    policy: &Policy,
    descriptor: &ResourceDescriptor,
) -> Result<Predicate, SchemaError> {
    let mut leaves = policy
        .conditions
        .iter()
        .map(|condition| compile_condition(condition, descriptor))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();

    let grouped = match leaves.next() {
        None => Predicate::AlwaysTrue,
        Some(first) => leaves.fold(first, Predicate::and).group(),
    };

    Ok(match policy.effect {
        Effect::Allow => grouped,
        Effect::Deny => !grouped,
    })
}

pub(crate) fn compile_condition(
    condition: &Condition,
    descriptor: &ResourceDescriptor,
) -> Result<Predicate, SchemaError> {
    let column_type = descriptor.column_type(&condition.column).ok_or_else(|| {
        SchemaError::UnknownColumn {
            resource: descriptor.resource().to_owned(),
            column: condition.column.clone(),
        }
    })?;
    let op = Operator::from_token(&condition.predicate).ok_or_else(|| {
        SchemaError::UnknownOperator {
            column: condition.column.clone(),
            token: condition.predicate.clone(),
        }
    })?;

    let mut value = normalize(op, &condition.value);
    // Date strings only become dates against date columns; patterns stay text.
    if column_type.is_temporal() && !matches!(op, Operator::Matches | Operator::DoesNotMatch) {
        value = column_type.coerce(value);
    }
    let mut column = ColumnRef::new(descriptor.table(), &condition.column);
    if value.is_date() {
        column = column.cast(Cast::Date);
    }

    Ok(match value {
        Value::List(items) if op.is_membership() => Predicate::Membership {
            column,
            op,
            values: items.into_iter().map(|v| column_type.coerce(v)).collect(),
        },
        value => Predicate::Compare { column, op, value },
    })
}

/// Membership operators get a list: lists pass through, strings are split on
/// runs of `;` and `,`, anything else yields an empty list.
pub(crate) fn normalize(op: Operator, raw: &Value) -> Value {
    if !op.is_membership() {
        return raw.clone();
    }
    match raw {
        Value::List(_) => raw.clone(),
        Value::String(s) => Value::List(split_list(s)),
        _ => Value::List(Vec::new()),
    }
}

/// A separator run counts once. A leading empty element is kept, trailing
/// ones are not, and elements are trimmed after splitting.
fn split_list(raw: &str) -> Vec<Value> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let mut pieces = raw.split([';', ',']);
    let mut items: Vec<&str> = pieces.next().into_iter().collect();
    items.extend(pieces.filter(|piece| !piece.is_empty()));
    while items.last().is_some_and(|piece| piece.is_empty()) {
        items.pop();
    }
    items
        .into_iter()
        .map(|item| Value::String(item.trim().to_owned()))
        .collect()
}
