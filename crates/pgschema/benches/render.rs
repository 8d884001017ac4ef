use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgschema::prelude::*;

mod item {
    pgschema::table! {
        pub struct Item("item"): IdentityRefCount {
            NAME: Name => "name": String,
            SCORE: Score => "score": i32,
            ACTIVE: Active => "active": bool,
        }
    }
}

use item::{Active, Item, Name, Score};

/// `(id = 0) OR (id = 1) OR ...` nested left to right with `n` leaves.
fn build_predicate(n: i32) -> Predicate<Item> {
    (1..n).fold(Item::ID.eq(0), |acc, i| acc | Item::ID.eq(i))
}

fn bench_predicate(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/predicate");

    for n in [1, 5, 10, 50, 100] {
        let q = select((Item::ID, Item::NAME)).filter(build_predicate(n));
        group.bench_with_input(BenchmarkId::new("inline", n), &q, |b, q| {
            b.iter(|| black_box(q.to_sql()));
        });
        group.bench_with_input(BenchmarkId::new("numbered", n), &q, |b, q| {
            b.iter(|| black_box(q.build()));
        });
    }

    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("render/insert", |b| {
        b.iter(|| {
            let q = Item::insert((Name("it's".into()), Score(5), Active(true))).returning_id();
            black_box(q.build())
        });
    });
}

fn bench_update(c: &mut Criterion) {
    c.bench_function("render/update", |b| {
        b.iter(|| {
            let q = Item::update()
                .set(Item::SCORE, 10)
                .set(Item::NAME, "renamed")
                .filter(Item::ID.eq(7) & Item::ACTIVE.eq(true));
            black_box(q.build())
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    let q = Item::select_all();
    let row = vec![
        Value::Int(1),
        Value::Int(0),
        Value::from("name"),
        Value::Int(5),
        Value::Bool(true),
    ];
    c.bench_function("render/decode_row", |b| {
        b.iter(|| black_box(q.decode(row.clone())));
    });
}

criterion_group!(benches, bench_predicate, bench_insert, bench_update, bench_decode);
criterion_main!(benches);
