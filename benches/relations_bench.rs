//! Relation-query microbenchmarks (assignability chain walk, subtype BFS).

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use typir_graph::edge::ConversionMode;
use typir_graph::kind::primitive::PrimitiveData;
use typir_graph::{TypeGraph, TypeId, TypeKind};

fn primitive(g: &mut TypeGraph, name: &str) -> TypeId {
    g.create_type(name, TypeKind::Primitive(PrimitiveData { name: name.into() }))
}

/// `a0 <:sub a1 <:sub ... <:sub a_{n-1}`, alternating a conversion edge in
/// between every other link so both BFS edge kinds get walked.
fn build_chain(n: usize) -> (TypeGraph, Vec<TypeId>) {
    let mut g = TypeGraph::new();
    let ids: Vec<TypeId> = (0..n).map(|i| primitive(&mut g, &format!("t{i}"))).collect();
    for i in 0..n - 1 {
        if i % 2 == 0 {
            g.mark_as_sub_type(ids[i], ids[i + 1], true).unwrap();
        } else {
            g.mark_as_convertible(ids[i], ids[i + 1], ConversionMode::ImplicitExplicit);
        }
    }
    (g, ids)
}

fn bench_assignability(c: &mut Criterion) {
    let (mut g, ids) = build_chain(64);
    let first = ids[0];
    let last = *ids.last().unwrap();
    let unrelated = primitive(&mut g, "unrelated");

    c.bench_function("assignability_chain_hit", |b| {
        b.iter(|| black_box(g.is_assignable(first, last)))
    });

    c.bench_function("assignability_chain_miss", |b| {
        b.iter(|| black_box(g.is_assignable(first, unrelated)))
    });
}

fn bench_subtype(c: &mut Criterion) {
    let (g, ids) = build_chain(64);
    let first = ids[0];
    let last = *ids.last().unwrap();

    c.bench_function("subtype_chain_reflexive_cache_hit", |b| {
        b.iter(|| {
            black_box(g.is_sub_type(first, last));
            black_box(g.is_sub_type(first, last))
        })
    });
}

criterion_group!(relations_benches, bench_assignability, bench_subtype);
criterion_main!(relations_benches);
