// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolves a small three-generation hierarchy twice, once in full and once
//! incrementally, printing trace lines to stderr and Chrome trace JSON of the
//! full pass to stdout.

use strata_core::exec::Serial;
use strata_core::hierarchy::{HierarchyView, ParentIndex};
use strata_core::math::{Mat4, Quat, Vec3};
use strata_core::schedule::{GenerationLayout, GenerationSchedule};
use strata_core::trace::Tracer;
use strata_core::transform::LocalTransform;
use strata_debug::chrome;
use strata_debug::pretty::PrettyPrintSink;
use strata_debug::recorder::RecorderSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // seed | 2 roots | 3 children | 2 grandchildren
    let layout = GenerationLayout::from_lengths([2, 3, 2]);
    let absolute = [
        ParentIndex::NONE,
        ParentIndex::NONE,
        ParentIndex::NONE,
        ParentIndex::new(1),
        ParentIndex::new(1),
        ParentIndex::new(2),
        ParentIndex::new(3),
        ParentIndex::new(5),
    ];
    let relative = layout.to_relative(&absolute)?;

    let spin = Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.25);
    let mut locals = vec![LocalTransform::new(1.0, spin, Vec3::new(1.0, 0.0, 0.0)); 8];
    locals[0] = LocalTransform::IDENTITY;

    let mut schedule = GenerationSchedule::from_layout(&layout);
    let mut world = vec![Mat4::IDENTITY; layout.node_count()];

    let mut recorder = RecorderSink::new();
    {
        let view = HierarchyView::new(&locals, &relative);
        let _ = schedule.resolve_dirty(&view, &mut world[..], &Serial, &mut Tracer::new(&mut recorder));
    }

    // Move the children; only generations 2 and 3 re-run.
    for local in &mut locals[3..6] {
        local.position = Vec3::new(0.0, 2.0, 0.0);
    }
    schedule.mark_dirty(2);
    let mut pretty = PrettyPrintSink::stderr();
    let view = HierarchyView::new(&locals, &relative);
    let _ = schedule.resolve_dirty(&view, &mut world[..], &Serial, &mut Tracer::new(&mut pretty));

    for (slot, m) in world.iter().enumerate().skip(1) {
        let p = m.translation();
        eprintln!("slot {slot}: ({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
    }

    chrome::export(recorder.as_bytes(), &mut std::io::stdout())?;
    Ok(())
}
