use rolescope::memory::{MemorySchema, MemoryStore};
use rolescope::{
    column, Condition, ColumnType, Effect, ExecutorError, ExtraFilters, FilterError, Operator,
    Policy, PolicyFilter, Predicate, QueryExecutor, Record, ResourceDescriptor, SchemaError, Value,
};

fn orders() -> ResourceDescriptor {
    ResourceDescriptor::new("orders")
        .table_name("shop_orders")
        .column("id", ColumnType::Integer)
        .column("total", ColumnType::Float)
        .column("paid", ColumnType::Boolean)
        .column("owner_id", ColumnType::Integer)
}

fn predicate(policies: Vec<Policy>) -> Result<Predicate, SchemaError> {
    PolicyFilter::builder("orders")
        .policies(policies)
        .build()
        .predicate(&orders())
}

#[test]
fn column_references_use_the_table_name() {
    let p = predicate(vec![Policy::allow(vec![column("total").gteq(9.5)])]).unwrap();
    assert_eq!(p.to_string(), "(shop_orders.total >= 9.5)");
}

#[test]
fn unknown_column_is_rejected() {
    let err = predicate(vec![Policy::allow(vec![column("salary").gt(1_i64)])]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownColumn {
            resource: "orders".into(),
            column: "salary".into(),
        }
    );
    assert_eq!(err.to_string(), "unknown column 'salary' on resource 'orders'");
}

#[test]
fn unknown_operator_is_rejected() {
    let err = predicate(vec![Policy::allow(vec![Condition::new(
        "total",
        "destroy_all",
        1_i64,
    )])])
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown predicate 'destroy_all' on column 'total'"
    );
}

#[test]
fn error_in_a_later_policy_fails_the_whole_compile() {
    let result = predicate(vec![
        Policy::allow(vec![column("paid").eq(true)]),
        Policy::deny(vec![column("nope").eq(1_i64)]),
    ]);
    assert!(matches!(result, Err(SchemaError::UnknownColumn { .. })));
}

#[test]
fn unknown_resource_surfaces_from_run() {
    let filter = PolicyFilter::builder("invoices")
        .policy(Policy::allow(vec![]))
        .build();
    let err = filter
        .run(&MemorySchema::new().with(orders()), &MemoryStore::new())
        .unwrap_err();
    assert!(matches!(err, FilterError::UnknownResource(_)));
    assert_eq!(err.to_string(), "unknown resource 'invoices'");
}

#[test]
fn unknown_effect_allows() {
    assert_eq!(Effect::from_token("block"), Effect::Allow);
    assert_eq!(Effect::from_token("DENY"), Effect::Allow);
    assert_eq!(Effect::from_token("deny"), Effect::Deny);
}

#[test]
fn empty_membership_list_matches_no_rows() {
    let row = Record::new().set("owner_id", 1_i64);
    for op in [Operator::In, Operator::NotIn, Operator::EqAny] {
        let p = predicate(vec![Policy::allow(vec![column("owner_id").op(op, ";,;")])])
            .unwrap();
        assert_eq!(p.evaluate(&row), None, "{op} on empty list");
        assert!(!p.matches(&row));
    }

    let p = predicate(vec![Policy::allow(vec![column("owner_id").not_in(Vec::<i64>::new())])])
        .unwrap();
    assert_eq!(p.to_string(), "(shop_orders.owner_id NOT IN (NULL))");
}

#[test]
fn negated_empty_membership_still_matches_nothing() {
    let p = predicate(vec![Policy::deny(vec![column("owner_id").is_in("")])]).unwrap();
    assert!(!p.matches(&Record::new().set("owner_id", 1_i64)));
}

#[test]
fn scalar_membership_value_becomes_an_empty_list() {
    let p = predicate(vec![Policy::allow(vec![column("owner_id").is_in(5_i64)])]).unwrap();
    assert_eq!(p.to_string(), "(shop_orders.owner_id IN (NULL))");
}

#[test]
fn unparseable_membership_element_stays_a_string() {
    let p = predicate(vec![Policy::allow(vec![column("owner_id").is_in("1, two")])]).unwrap();
    assert_eq!(p.to_string(), "(shop_orders.owner_id IN (1, 'two'))");
    assert!(p.matches(&Record::new().set("owner_id", 1_i64)));
}

#[test]
fn null_column_is_unknown_not_false() {
    let p = predicate(vec![Policy::deny(vec![column("paid").eq(true)])]).unwrap();
    let row = Record::new().set("id", 1_i64);
    assert_eq!(p.evaluate(&row), None);
    assert!(!p.matches(&row));
}

#[test]
fn type_mismatch_is_unknown() {
    let p = predicate(vec![Policy::allow(vec![column("total").gt("many")])]).unwrap();
    assert_eq!(p.evaluate(&Record::new().set("total", 3.0)), None);
}

#[test]
fn string_quotes_are_escaped() {
    let desc = ResourceDescriptor::new("users").column("name", ColumnType::Text);
    let p = PolicyFilter::builder("users")
        .policy(Policy::allow(vec![column("name").eq("O'Brien")]))
        .build()
        .predicate(&desc)
        .unwrap();
    assert_eq!(p.to_string(), "(users.name = 'O''Brien')");
}

#[test]
fn many_policies_fold_left() {
    let policies: Vec<Policy> = (0..4_i64)
        .map(|i| Policy::allow(vec![column("id").eq(i)]))
        .collect();
    let p = predicate(policies).unwrap();
    assert_eq!(
        p.to_string(),
        "(shop_orders.id = 0) OR (shop_orders.id = 1) OR (shop_orders.id = 2) OR (shop_orders.id = 3)"
    );
    match p {
        Predicate::Or(left, _) => assert!(matches!(*left, Predicate::Or(..))),
        other => panic!("expected Or, got {other:?}"),
    }
}

struct FailingExecutor;

impl QueryExecutor for FailingExecutor {
    type Cursor = std::vec::IntoIter<Record>;

    fn execute(
        &self,
        _resource: &ResourceDescriptor,
        _predicate: &Predicate,
        _filters: &ExtraFilters,
    ) -> Result<Self::Cursor, ExecutorError> {
        Err("database unavailable".into())
    }
}

#[test]
fn executor_failure_is_wrapped() {
    let filter = PolicyFilter::builder("orders").role("admin").build();
    let err = filter
        .run(&MemorySchema::new().with(orders()), &FailingExecutor)
        .unwrap_err();
    assert!(matches!(err, FilterError::Executor(_)));
    assert_eq!(err.to_string(), "query executor failed: database unavailable");
}

#[test]
fn filter_values_reach_the_executor_untouched() {
    struct Capture;

    impl QueryExecutor for Capture {
        type Cursor = Option<Value>;

        fn execute(
            &self,
            _resource: &ResourceDescriptor,
            _predicate: &Predicate,
            filters: &ExtraFilters,
        ) -> Result<Option<Value>, ExecutorError> {
            Ok(filters.get("owner_id").cloned())
        }
    }

    let filter = PolicyFilter::builder("orders")
        .role("admin")
        .extra_filter("owner_id", "42")
        .build();
    let seen = filter
        .run(&MemorySchema::new().with(orders()), &Capture)
        .unwrap();
    assert_eq!(seen, Some(Value::from("42")));
}
