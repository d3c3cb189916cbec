use rolescope::memory::{MemorySchema, MemoryStore};
use rolescope::{column, ColumnType, Policy, PolicyFilter, Record, ResourceDescriptor};

fn main() {
    // Describe the resource
    let schema = MemorySchema::new().with(
        ResourceDescriptor::new("users")
            .column("name", ColumnType::Text)
            .column("age", ColumnType::Integer)
            .column("region", ColumnType::Text),
    );

    let store = MemoryStore::new().with_rows(
        "users",
        vec![
            Record::new().set("name", "ana").set("age", 34_i64).set("region", "US"),
            Record::new().set("name", "bo").set("age", 29_i64).set("region", "EU"),
            Record::new().set("name", "cy").set("age", 16_i64).set("region", "US"),
        ],
    );

    // Adults outside the EU
    let filter = PolicyFilter::builder("users")
        .role("support")
        .policy(Policy::allow(vec![
            column("age").gteq(18_i64),
            column("region").not_eq("EU"),
        ]))
        .build();

    println!("{filter}");

    let rows = filter
        .run(&schema, &store)
        .expect("failed to run policy filter");
    for row in rows {
        let columns: Vec<String> = row
            .iter()
            .map(|(column, value)| format!("{column}={value}"))
            .collect();
        println!("  {}", columns.join(" "));
    }
}
