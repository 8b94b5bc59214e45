// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root walk vs. generation-ordered resolution on a wide, shallow forest:
//! 128Ki nodes in chains of 16.

#![allow(missing_docs, reason = "criterion macros generate undocumented items")]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use strata_core::exec::Serial;
use strata_core::hierarchy::{HierarchyView, ParentIndex};
use strata_core::math::{Mat4, Quat, Vec3, Vec4};
use strata_core::resolve::resolve_root_walk;
use strata_core::schedule::{GenerationLayout, resolve_layout};
use strata_core::store::ColumnMatrices;
use strata_core::trace::Tracer;
use strata_core::transform::LocalTransform;

const NODES: usize = 128 * 1024;
const DEPTH: usize = 16;

struct Forest {
    layout: GenerationLayout,
    locals: Vec<LocalTransform>,
    absolute: Vec<ParentIndex>,
    relative: Vec<ParentIndex>,
}

/// `NODES / DEPTH` chains, stored depth-sorted behind the seed slot.
fn forest() -> Forest {
    let width = NODES / DEPTH;
    let layout = GenerationLayout::from_lengths([width; DEPTH]);
    let local = LocalTransform::new(
        1.0,
        Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.1),
        Vec3::new(1.0, 1.0, 1.0),
    );
    let locals = vec![local; layout.node_count()];

    let mut absolute = vec![ParentIndex::NONE; layout.node_count()];
    for pair in layout.ranges()[1..].windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);
        for (i, slot) in current.clone().enumerate() {
            absolute[slot] = ParentIndex::new(u32::try_from(previous.start + i).unwrap());
        }
    }
    let relative = layout.to_relative(&absolute).unwrap();
    Forest {
        layout,
        locals,
        absolute,
        relative,
    }
}

fn bench_strategies(c: &mut Criterion) {
    let forest = forest();
    let n = forest.layout.node_count();
    let abs_view = HierarchyView::new(&forest.locals, &forest.absolute);
    let rel_view = HierarchyView::new(&forest.locals, &forest.relative);
    let mut packed = vec![Mat4::IDENTITY; n];

    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(NODES as u64));
    group.sample_size(20);

    group.bench_function(BenchmarkId::new("root_walk", "serial"), |b| {
        b.iter(|| {
            resolve_root_walk(
                n,
                n,
                black_box(&abs_view),
                &mut packed[..],
                &Serial,
                &mut Tracer::none(),
            )
        });
    });

    group.bench_function(BenchmarkId::new("generation", "serial"), |b| {
        b.iter(|| {
            resolve_layout(
                &forest.layout,
                black_box(&rel_view),
                &mut packed[..],
                &Serial,
                &mut Tracer::none(),
            )
        });
    });

    #[cfg(feature = "parallel")]
    {
        use strata_core::exec::Rayon;

        for min_len in [64, 256, 1024] {
            let rayon = Rayon::new().with_min_len(min_len);
            group.bench_with_input(
                BenchmarkId::new("root_walk/rayon", min_len),
                &rayon,
                |b, rayon| {
                    b.iter(|| {
                        resolve_root_walk(
                            n,
                            n,
                            black_box(&abs_view),
                            &mut packed[..],
                            rayon,
                            &mut Tracer::none(),
                        )
                    });
                },
            );
            group.bench_with_input(
                BenchmarkId::new("generation/rayon", min_len),
                &rayon,
                |b, rayon| {
                    b.iter(|| {
                        resolve_layout(
                            &forest.layout,
                            black_box(&rel_view),
                            &mut packed[..],
                            rayon,
                            &mut Tracer::none(),
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_columns(c: &mut Criterion) {
    let forest = forest();
    let n = forest.layout.node_count();
    let rel_view = HierarchyView::new(&forest.locals, &forest.relative);
    let (mut x, mut y, mut z, mut w) = (
        vec![Vec4::ZERO; n],
        vec![Vec4::ZERO; n],
        vec![Vec4::ZERO; n],
        vec![Vec4::ZERO; n],
    );
    let mut columns = ColumnMatrices::new(&mut x, &mut y, &mut z, &mut w);

    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements(NODES as u64));
    group.sample_size(20);
    group.bench_function("generation/columns", |b| {
        b.iter(|| {
            resolve_layout(
                &forest.layout,
                black_box(&rel_view),
                &mut columns,
                &Serial,
                &mut Tracer::none(),
            )
        });
    });
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_columns);
criterion_main!(benches);
