use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlchain::{BuilderConfig, Db, SelectQuery, Statement};

/// SELECT col0, col1, ... FROM {t} WHERE col0 = ? AND col1 = ? ...
fn build_select(db: &Db, n: usize) -> SelectQuery {
    let mut q = db.table("t");
    for i in 0..n {
        q = q.select(&format!("col{i}"));
    }
    for i in 0..n {
        q = q
            .where_(&format!("col{i}"), "=", i as i64)
            .expect("valid operator");
    }
    q
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/select");
    let db = Db::new();

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(&db, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.compile()));
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/build_and_compile");
    let db = Db::with_config(BuilderConfig::postgres());

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(&db, n).compile()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/in_list");
    let db = Db::with_config(BuilderConfig::postgres());

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let q = db.table("t").where_in("id", values.clone());
                black_box(q.compile());
            });
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/nested");
    let db = Db::with_config(BuilderConfig::postgres());

    for depth in [1, 4, 16] {
        let mut q = db.table("t0").where_("id", "=", 0).expect("valid operator");
        for d in 1..depth {
            q = db
                .table(&format!("t{d}"))
                .where_("id", "=", d as i64)
                .expect("valid operator")
                .where_in("parent", q.select("id"));
        }
        group.bench_with_input(BenchmarkId::from_parameter(depth), &q, |b, q| {
            b.iter(|| black_box(q.compile()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_compile,
    bench_build_and_compile,
    bench_in_list,
    bench_nested
);
criterion_main!(benches);
