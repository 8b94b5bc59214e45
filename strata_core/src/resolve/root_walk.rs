// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Independent per-node resolution by walking up to the root.

use crate::exec::Executor;
use crate::hierarchy::HierarchyView;
use crate::math::Mat4;
use crate::store::{MatrixSlots, MatrixStore};
use crate::trace::{BatchBeginEvent, BatchEndEvent, BatchKind, Tracer};

/// Computes the world matrix of node `idx` from its ancestor chain.
///
/// Parent indices are absolute. Each step prepends the parent's local matrix,
/// so the result is `M(root) · … · M(parent) · M(idx)`.
///
/// A cycle in the parent links never terminates.
///
/// # Panics
///
/// Panics if `idx` or any ancestor index is out of range.
#[must_use]
pub fn world_matrix(idx: usize, hierarchy: &HierarchyView<'_>) -> Mat4 {
    let mut m = hierarchy.local(idx).to_matrix();
    let mut link = hierarchy.parent(idx);
    while let Some(p) = link.get() {
        let p = p as usize;
        m = hierarchy.local(p).to_matrix() * m;
        link = hierarchy.parent(p);
    }
    m
}

/// One work-item: writes the world matrix of node `idx` into slot `idx`.
///
/// Items with `idx >= limit` do nothing, so a launch can be padded past the
/// node count.
pub fn resolve_root_walk_item<S>(
    idx: usize,
    limit: usize,
    hierarchy: &HierarchyView<'_>,
    out: &mut S,
) where
    S: MatrixStore + ?Sized,
{
    if idx >= limit {
        return;
    }
    out.write(idx, world_matrix(idx, hierarchy));
}

/// Runs a root-walk launch of `launch_size` work-items.
///
/// Slots `[0, min(launch_size, limit))` are written. Every other slot is left
/// untouched. Returns the number of slots written.
///
/// # Panics
///
/// Panics if the hierarchy or the store is shorter than the number of slots
/// to write.
pub fn resolve_root_walk<S, E>(
    launch_size: usize,
    limit: usize,
    hierarchy: &HierarchyView<'_>,
    out: &mut S,
    executor: &E,
    tracer: &mut Tracer<'_>,
) -> usize
where
    S: MatrixStore + ?Sized,
    E: Executor,
{
    let active = launch_size.min(limit);
    assert!(
        active <= hierarchy.len(),
        "limit {active} exceeds node count {}",
        hierarchy.len()
    );
    assert!(
        active <= out.len(),
        "store of {} slots is too small for {active} nodes",
        out.len()
    );

    tracer.batch_begin(&BatchBeginEvent {
        kind: BatchKind::RootWalk,
        offset_last: 0,
        offset_this: 0,
        len: launch_size,
    });

    let (_, slots) = out.split_at_slot(0);
    let (slots, _) = slots.split_slots(active);
    executor.fill(slots, |idx| world_matrix(idx, hierarchy));

    tracer.batch_end(&BatchEndEvent {
        kind: BatchKind::RootWalk,
        written: active,
    });
    active
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::exec::Serial;
    use crate::hierarchy::ParentIndex;
    use crate::math::{Quat, Vec3, Vec4};
    use crate::transform::LocalTransform;

    fn shift(x: f32, y: f32, z: f32) -> LocalTransform {
        LocalTransform::from_position(Vec3::new(x, y, z))
    }

    /// `len` nodes, each the child of the one before it.
    fn chain_parents(len: u32) -> Vec<ParentIndex> {
        (0..len)
            .map(|i| ParentIndex::from(i.checked_sub(1)))
            .collect()
    }

    #[test]
    fn root_equals_local() {
        let locals = [LocalTransform::new(
            1.0,
            Quat::IDENTITY,
            Vec3::new(1.0, 2.0, 3.0),
        )];
        let parents = [ParentIndex::NONE];
        let view = HierarchyView::new(&locals, &parents);
        let m = world_matrix(0, &view);
        assert_eq!(m, locals[0].to_matrix());
        assert_eq!(m.w, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn chain_composes_outer_first() {
        let a = LocalTransform::new(
            2.0,
            Quat::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), 0.4),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let b = LocalTransform::new(
            1.0,
            Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), -0.9),
            Vec3::new(0.0, 3.0, 0.0),
        );
        let c = shift(0.0, 0.0, 5.0);
        let locals = [a, b, c];
        let parents = chain_parents(3);
        let view = HierarchyView::new(&locals, &parents);

        let expected = a.to_matrix() * b.to_matrix() * c.to_matrix();
        assert!(world_matrix(2, &view).abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn scaled_chain() {
        let locals = [
            LocalTransform::new(0.5, Quat::IDENTITY, Vec3::new(1.0, 0.0, 0.0)),
            LocalTransform::new(0.5, Quat::IDENTITY, Vec3::new(0.0, 1.0, 0.0)),
            LocalTransform::new(0.5, Quat::IDENTITY, Vec3::new(0.0, 0.0, 1.0)),
        ];
        let parents = chain_parents(3);
        let view = HierarchyView::new(&locals, &parents);
        let leaf = world_matrix(2, &view);
        assert_eq!(leaf.x, Vec4::new(0.125, 0.0, 0.0, 0.0));
        assert_eq!(leaf.w, Vec4::new(1.0, 0.5, 0.25, 1.0));
    }

    #[test]
    fn five_link_chain_positions() {
        let locals = [shift(1.0, 1.0, 1.0); 5];
        let parents = chain_parents(5);
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 5];
        let written = resolve_root_walk(5, 5, &view, &mut out[..], &Serial, &mut Tracer::none());
        assert_eq!(written, 5);
        for (i, m) in out.iter().enumerate() {
            let k = (i + 1) as f32;
            assert_eq!(m.mul_vec4(Vec4::W), Vec4::new(k, k, k, 1.0));
        }
    }

    #[test]
    fn two_root_tree() {
        let up = shift(1.0, 1.0, 1.0);
        let down = shift(-1.0, -1.0, -1.0);
        let locals = [up, down, up, down, up, down];
        let parents = [
            ParentIndex::NONE,
            ParentIndex::NONE,
            ParentIndex::new(0),
            ParentIndex::new(0),
            ParentIndex::new(1),
            ParentIndex::new(1),
        ];
        let view = HierarchyView::new(&locals, &parents);
        let origin = Vec3::ZERO;
        let p = |i| world_matrix(i, &view).transform_point3(origin);
        assert_eq!(p(2), Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(p(3), Vec3::ZERO);
        assert_eq!(p(4), Vec3::ZERO);
        assert_eq!(p(5), Vec3::new(-2.0, -2.0, -2.0));
    }

    #[test]
    fn item_past_limit_is_noop() {
        let locals = [shift(1.0, 0.0, 0.0); 3];
        let parents = chain_parents(3);
        let view = HierarchyView::new(&locals, &parents);
        let sentinel = Mat4::from_scale(7.0);
        let mut out = vec![sentinel; 3];

        resolve_root_walk_item(2, 2, &view, &mut out[..]);
        assert_eq!(out[2], sentinel);
        resolve_root_walk_item(1, 2, &view, &mut out[..]);
        assert_eq!(out[1].translation(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn padded_launch_leaves_tail_untouched() {
        let locals = [shift(1.0, 0.0, 0.0); 4];
        let parents = chain_parents(4);
        let view = HierarchyView::new(&locals, &parents);
        let sentinel = Mat4::from_scale(7.0);
        let mut out = vec![sentinel; 8];

        let written = resolve_root_walk(8, 3, &view, &mut out[..], &Serial, &mut Tracer::none());
        assert_eq!(written, 3);
        assert_eq!(out[2].translation(), Vec3::new(3.0, 0.0, 0.0));
        assert!(out[3..].iter().all(|m| *m == sentinel));
    }

    #[test]
    #[should_panic(expected = "too small")]
    fn short_store_panics() {
        let locals = [LocalTransform::IDENTITY; 4];
        let parents = chain_parents(4);
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 2];
        let _ = resolve_root_walk(4, 4, &view, &mut out[..], &Serial, &mut Tracer::none());
    }
}
