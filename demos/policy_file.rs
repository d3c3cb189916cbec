use rolescope::memory::MemorySchema;
use rolescope::{ColumnType, PolicyFilter, PolicySet, ResourceDescriptor, SchemaResolver};

fn main() {
    let set = PolicySet::from_file("demos/policies.rolescope").expect("failed to load policies");

    println!("{set}");

    let schema = MemorySchema::new()
        .with(
            ResourceDescriptor::new("users")
                .column("age", ColumnType::Integer)
                .column("region", ColumnType::Text)
                .column("status", ColumnType::Text),
        )
        .with(
            ResourceDescriptor::new("orders")
                .column("status", ColumnType::Text)
                .column("created_on", ColumnType::Timestamp),
        );

    for resource in set.resources() {
        let descriptor = schema.resolve(resource).expect("unknown resource");
        let filter = PolicyFilter::builder(resource).policy_set(&set).build();
        match filter.predicate(&descriptor) {
            Ok(predicate) => println!("{resource}: WHERE {predicate}"),
            Err(err) => println!("{resource}: {err}"),
        }
    }
}
