use std::sync::Arc;
use std::thread;

use rolescope::memory::{MemorySchema, MemoryStore};
use rolescope::{column, ColumnType, Policy, PolicyFilter, Record, ResourceDescriptor, Value};

fn ids(rows: impl Iterator<Item = Record>) -> Vec<i64> {
    rows.filter_map(|row| match row.get("id") {
        Some(Value::Int(id)) => Some(*id),
        _ => None,
    })
    .collect()
}

#[test]
fn filters_run_across_threads() {
    let schema = Arc::new(
        MemorySchema::new().with(
            ResourceDescriptor::new("tickets")
                .column("id", ColumnType::Integer)
                .column("owner", ColumnType::Text)
                .column("priority", ColumnType::Integer),
        ),
    );
    let store = Arc::new(MemoryStore::new().with_rows(
        "tickets",
        (1_i64..=6).map(|id| {
            Record::new()
                .set("id", id)
                .set("owner", if id % 2 == 0 { "ana" } else { "bo" })
                .set("priority", id)
        }),
    ));

    let filters = vec![
        // Thread 1: admin sees everything
        PolicyFilter::builder("tickets").role("admin").build(),
        // Thread 2: client scoped to its own tickets
        PolicyFilter::builder("tickets")
            .policy(Policy::allow(vec![column("owner").eq("ana")]))
            .build(),
        // Thread 3: support role, urgent tickets or anything not owned by bo
        PolicyFilter::builder("tickets")
            .role("support")
            .policy(Policy::allow(vec![column("priority").gteq(4_i64)]))
            .policy(Policy::deny(vec![column("owner").eq("bo")]))
            .build(),
        // Thread 4: client with nothing granted
        PolicyFilter::builder("tickets").build(),
    ];

    let handles: Vec<_> = filters
        .into_iter()
        .map(|filter| {
            let schema = Arc::clone(&schema);
            let store = Arc::clone(&store);
            thread::spawn(move || ids(filter.run(schema.as_ref(), store.as_ref()).unwrap()))
        })
        .collect();

    let results: Vec<Vec<i64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results[0], vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(results[1], vec![2, 4, 6]);
    assert_eq!(results[2], vec![2, 4, 5, 6]);
    assert!(results[3].is_empty());
}

#[test]
fn shared_predicate_evaluates_concurrently() {
    let descriptor = ResourceDescriptor::new("tickets").column("priority", ColumnType::Integer);
    let predicate = Arc::new(
        PolicyFilter::builder("tickets")
            .policy(Policy::allow(vec![column("priority").is_in("1;3;5")]))
            .build()
            .predicate(&descriptor)
            .unwrap(),
    );

    let handles: Vec<_> = (0_i64..8)
        .map(|n| {
            let predicate = Arc::clone(&predicate);
            thread::spawn(move || predicate.matches(&Record::new().set("priority", n)))
        })
        .collect();

    let matched: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        matched,
        vec![false, true, false, true, false, true, false, false]
    );
}

#[test]
fn core_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PolicyFilter>();
    assert_send_sync::<rolescope::Predicate>();
    assert_send_sync::<Policy>();
    assert_send_sync::<ResourceDescriptor>();
    assert_send_sync::<rolescope::PolicySet>();
    assert_send_sync::<MemoryStore>();
}
