use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rolescope::memory::{MemorySchema, MemoryStore};
use rolescope::{column, ColumnType, Policy, PolicyFilter, PolicySet, Record, ResourceDescriptor};

fn descriptor(n: usize) -> ResourceDescriptor {
    (0..n).fold(ResourceDescriptor::new("items"), |desc, i| {
        desc.column(&format!("c{i}"), ColumnType::Integer)
    })
}

/// `n` policies, each constraining one column with a comparison and a
/// delimited membership list.
fn build_filter(n: usize) -> PolicyFilter {
    let policies = (0..n).map(|i| {
        let name = format!("c{i}");
        Policy::allow(vec![
            column(&name).gteq(1_i64),
            column(&name).is_in("1;2;3;5;8;13"),
        ])
    });
    PolicyFilter::builder("items").policies(policies).build()
}

fn record(n: usize) -> Record {
    (0..n).fold(Record::new(), |rec, i| rec.set(&format!("c{i}"), 13_i64))
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for &n in &[5, 20, 50] {
        let desc = descriptor(n);
        let filter = build_filter(n);
        group.bench_function(format!("{n}_policies"), |b| {
            b.iter(|| black_box(filter.predicate(black_box(&desc)).unwrap()));
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for &n in &[5, 20, 50] {
        let desc = descriptor(n);
        let predicate = build_filter(n).predicate(&desc).unwrap();
        let rec = record(n);
        group.bench_function(format!("{n}_policies"), |b| {
            b.iter(|| predicate.matches(black_box(&rec)));
        });
    }

    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    let n = 10;
    let schema = MemorySchema::new().with(descriptor(n));

    for &rows in &[100, 1_000] {
        let store = MemoryStore::new().with_rows("items", (0..rows).map(|_| record(n)));
        let filter = build_filter(n);
        group.bench_function(format!("{rows}_rows"), |b| {
            b.iter(|| filter.run(&schema, &store).unwrap().count());
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let text: String = (0..50)
        .map(|i| format!("policy items allow {{\n    c{i} >= 1\n    c{i} in \"1;2;3\"\n}}\n"))
        .collect();
    c.bench_function("parse_50_policies", |b| {
        b.iter(|| PolicySet::from_text(black_box(&text)).unwrap());
    });
}

criterion_group!(benches, bench_compile, bench_evaluate, bench_run, bench_parse);
criterion_main!(benches);
