// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation-ordered resolution.
//!
//! Nodes are stored sorted by depth. Each depth level (a *generation*) is one
//! contiguous range of slots and one batch: every work-item reads its
//! parent's world matrix from the previous generation's range and composes
//! once.
//!
//! Slot 0 is the seed: it holds identity and acts as the parent of every root
//! in the first generation. Ordering is carried by [`GenerationToken`]:
//!
//! ```text
//!   seed_identity ─► Seeded ─► resolve_generation ─► Generation(1) ─► … ─► finish ─► Done
//! ```
//!
//! A token records which range was resolved last. The next batch takes its
//! parent range from the token and starts writing right after it, so batches
//! cannot be skipped, reordered, or run twice from one token.

use core::ops::Range;

use crate::exec::Executor;
use crate::hierarchy::HierarchyView;
use crate::math::Mat4;
use crate::schedule::GenerationLayout;
use crate::store::{MatrixSlots, MatrixStore, MatrixView};
use crate::trace::{BatchBeginEvent, BatchEndEvent, BatchKind, Tracer};

/// Where a generation-ordered pass currently stands.
///
/// Generations are numbered as in [`GenerationLayout`]: the seed slot is
/// generation 0, so the first depth level of nodes is `Generation(1)` and a
/// pass over `k` depth levels ends at `Generation(k)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolveState {
    /// Only the seed slot has been written.
    Seeded,
    /// Generations `1..=n` have been resolved.
    Generation(u32),
    /// The pass has been closed.
    Done,
}

/// Proof that a generation batch (or the seed) has completed.
///
/// Consumed by [`resolve_generation`] to run the next generation. Outside this
/// crate the only first token is the one [`seed_identity`] returns:
///
/// ```compile_fail
/// use strata_core::resolve::GenerationToken;
/// use strata_core::schedule::GenerationLayout;
///
/// let layout = GenerationLayout::from_lengths([1, 1]);
/// let token = GenerationToken::resume(&layout, 1);
/// ```
#[must_use = "a generation token is needed to run the next batch or finish the pass"]
#[derive(Debug, PartialEq, Eq)]
pub struct GenerationToken {
    range: Range<usize>,
    generation: u32,
}

impl GenerationToken {
    /// Picks up a pass after `generation` of `layout`, whose slots
    /// `[0, layout.range(generation).end)` must still hold the matrices of an
    /// earlier pass.
    ///
    /// # Panics
    ///
    /// Panics if `generation` is not in `layout`.
    pub(crate) fn resume(layout: &GenerationLayout, generation: u32) -> Self {
        Self {
            range: layout.range(generation),
            generation,
        }
    }

    /// Current state of the pass.
    #[must_use]
    pub fn state(&self) -> ResolveState {
        match self.generation {
            0 => ResolveState::Seeded,
            g => ResolveState::Generation(g),
        }
    }

    /// Number of the last resolved generation (0 for the seed).
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Slots written by the last batch.
    #[must_use]
    pub fn last_range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Number of leading slots that now hold world matrices.
    #[must_use]
    pub fn resolved_len(&self) -> usize {
        self.range.end
    }

    /// Closes the pass.
    pub fn finish(self) -> PassComplete {
        PassComplete {
            generations: self.generation,
            resolved_len: self.range.end,
        }
    }
}

/// A closed generation-ordered pass.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassComplete {
    /// Number of generations resolved, not counting the seed.
    pub generations: u32,
    /// Number of leading slots that hold world matrices, seed slot included.
    pub resolved_len: usize,
}

impl PassComplete {
    /// Always [`ResolveState::Done`].
    #[must_use]
    pub fn state(&self) -> ResolveState {
        ResolveState::Done
    }
}

/// Writes identity into slot 0 and starts a pass.
///
/// Repeating it is harmless.
///
/// # Panics
///
/// Panics if the store is empty.
pub fn seed_identity<S>(out: &mut S) -> GenerationToken
where
    S: MatrixStore + ?Sized,
{
    assert!(!out.is_empty(), "the seed needs a store with at least one slot");
    out.write(0, Mat4::IDENTITY);
    GenerationToken {
        range: 0..1,
        generation: 0,
    }
}

/// Composes the world matrix of the node at absolute slot `abs`.
///
/// A root link is read as relative index 0.
#[inline]
fn compose<V: MatrixView + ?Sized>(
    resolved: &V,
    offset_last: usize,
    abs: usize,
    hierarchy: &HierarchyView<'_>,
) -> Mat4 {
    let link = hierarchy.parent(abs);
    debug_assert!(
        offset_last == 0 || !link.is_root(),
        "root at slot {abs} is outside the first generation"
    );
    let rel = link.get().unwrap_or(0) as usize;
    let parent = offset_last + rel;
    assert!(
        parent < resolved.len(),
        "parent slot {parent} of slot {abs} lies past the previous generation"
    );
    resolved.load(parent) * hierarchy.local(abs).to_matrix()
}

/// One work-item: resolves the node at slot `offset_this + id`.
///
/// Its parent link is relative to `offset_last`. Roots read the seed slot,
/// so they may only appear while `offset_last` is 0; debug builds assert it.
///
/// The caller is responsible for having resolved the parent range first.
/// [`resolve_generation`] is the token-ordered batch form.
pub fn resolve_generation_item<S>(
    id: usize,
    offset_last: usize,
    offset_this: usize,
    hierarchy: &HierarchyView<'_>,
    out: &mut S,
) where
    S: MatrixStore + ?Sized,
{
    let abs = offset_this + id;
    let world = {
        let (resolved, _) = out.split_at_slot(abs);
        compose(&resolved, offset_last, abs, hierarchy)
    };
    out.write(abs, world);
}

/// Runs the generation after `token` over the next `len` slots.
///
/// Parents are read from the range `token` resolved. The returned token
/// covers the range just written.
///
/// # Panics
///
/// Panics if the hierarchy or the store ends before the new range does, or if
/// a parent link points past the previous generation.
pub fn resolve_generation<S, E>(
    token: GenerationToken,
    len: usize,
    hierarchy: &HierarchyView<'_>,
    out: &mut S,
    executor: &E,
    tracer: &mut Tracer<'_>,
) -> GenerationToken
where
    S: MatrixStore + ?Sized,
    E: Executor,
{
    let Range {
        start: offset_last,
        end: offset_this,
    } = token.range;
    let end = offset_this + len;
    assert!(
        end <= hierarchy.len(),
        "generation ends at slot {end} but the hierarchy has {} nodes",
        hierarchy.len()
    );
    assert!(
        end <= out.len(),
        "generation ends at slot {end} but the store has {} slots",
        out.len()
    );

    let generation = token.generation + 1;
    let kind = BatchKind::Generation(generation);
    tracer.batch_begin(&BatchBeginEvent {
        kind,
        offset_last,
        offset_this,
        len,
    });

    let (resolved, pending) = out.split_at_slot(offset_this);
    let (batch, _) = pending.split_slots(len);
    executor.fill(batch, |id| {
        compose(&resolved, offset_last, offset_this + id, hierarchy)
    });

    tracer.batch_end(&BatchEndEvent { kind, written: len });
    GenerationToken {
        range: offset_this..end,
        generation,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::exec::Serial;
    use crate::hierarchy::ParentIndex;
    use crate::math::{Quat, Vec3, Vec4};
    use crate::transform::LocalTransform;

    fn shift(x: f32, y: f32, z: f32) -> LocalTransform {
        LocalTransform::from_position(Vec3::new(x, y, z))
    }

    #[test]
    fn seed_writes_identity() {
        let mut out = vec![Mat4::from_scale(3.0); 2];
        let token = seed_identity(&mut out[..]);
        assert_eq!(out[0], Mat4::IDENTITY);
        assert_eq!(out[1], Mat4::from_scale(3.0));
        assert_eq!(token.state(), ResolveState::Seeded);
        assert_eq!(token.last_range(), 0..1);

        // Seeding again is harmless.
        let again = seed_identity(&mut out[..]);
        assert_eq!(again, token);
        assert_eq!(out[0], Mat4::IDENTITY);
    }

    #[test]
    #[should_panic(expected = "at least one slot")]
    fn seed_needs_a_slot() {
        let mut out: [Mat4; 0] = [];
        let _ = seed_identity(&mut out[..]);
    }

    #[test]
    fn tokens_advance_offsets() {
        // Slot 0 is the seed; generation 1 is [1, 3), generation 2 is [3, 6).
        let locals = [
            LocalTransform::IDENTITY,
            shift(1.0, 0.0, 0.0),
            shift(0.0, 1.0, 0.0),
            shift(0.0, 0.0, 1.0),
            shift(0.0, 0.0, 2.0),
            shift(0.0, 0.0, 3.0),
        ];
        let parents = [
            ParentIndex::NONE,
            ParentIndex::NONE,
            ParentIndex::NONE,
            ParentIndex::new(0),
            ParentIndex::new(1),
            ParentIndex::new(1),
        ];
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 6];
        let mut tracer = Tracer::none();

        let token = seed_identity(&mut out[..]);
        let token = resolve_generation(token, 2, &view, &mut out[..], &Serial, &mut tracer);
        assert_eq!(token.state(), ResolveState::Generation(1));
        assert_eq!(token.last_range(), 1..3);
        assert_eq!(out[1], locals[1].to_matrix());
        assert_eq!(out[2], locals[2].to_matrix());

        let token = resolve_generation(token, 3, &view, &mut out[..], &Serial, &mut tracer);
        assert_eq!(token.state(), ResolveState::Generation(2));
        assert_eq!(token.last_range(), 3..6);
        assert_eq!(token.resolved_len(), 6);

        let done = token.finish();
        assert_eq!(done.state(), ResolveState::Done);
        assert_eq!(done.generations, 2);
        assert_eq!(done.resolved_len, 6);

        assert_eq!(out[3].translation(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(out[4].translation(), Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(out[5].translation(), Vec3::new(0.0, 1.0, 3.0));
    }

    #[test]
    fn scaled_chain() {
        let locals = [
            LocalTransform::IDENTITY,
            LocalTransform::new(0.5, Quat::IDENTITY, Vec3::new(1.0, 0.0, 0.0)),
            LocalTransform::new(0.5, Quat::IDENTITY, Vec3::new(0.0, 1.0, 0.0)),
            LocalTransform::new(0.5, Quat::IDENTITY, Vec3::new(0.0, 0.0, 1.0)),
        ];
        let parents = [
            ParentIndex::NONE,
            ParentIndex::NONE,
            ParentIndex::new(0),
            ParentIndex::new(0),
        ];
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 4];
        let mut tracer = Tracer::none();

        let mut token = seed_identity(&mut out[..]);
        for _ in 0..3 {
            token = resolve_generation(token, 1, &view, &mut out[..], &Serial, &mut tracer);
        }
        let _ = token.finish();

        assert_eq!(out[3].x, Vec4::new(0.125, 0.0, 0.0, 0.0));
        assert_eq!(out[3].w, Vec4::new(1.0, 0.5, 0.25, 1.0));
    }

    #[test]
    fn single_item_matches_batch() {
        let locals = [LocalTransform::IDENTITY, shift(1.0, 1.0, 1.0), shift(2.0, 0.0, 0.0)];
        let parents = [ParentIndex::NONE, ParentIndex::NONE, ParentIndex::new(0)];
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 3];

        resolve_generation_item(0, 0, 1, &view, &mut out[..]);
        resolve_generation_item(0, 1, 2, &view, &mut out[..]);
        assert_eq!(out[1].translation(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(out[2].translation(), Vec3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn resume_continues_after_a_generation() {
        let layout = GenerationLayout::from_lengths([2, 1]);
        let token = GenerationToken::resume(&layout, 1);
        assert_eq!(token.state(), ResolveState::Generation(1));
        assert_eq!(token.last_range(), 1..3);
    }

    #[test]
    fn token_numbers_follow_layout() {
        let layout = GenerationLayout::from_lengths([2, 3]);
        let locals = [LocalTransform::IDENTITY; 6];
        let parents = [ParentIndex::NONE; 6];
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 6];

        let token = seed_identity(&mut out[..]);
        assert_eq!(token.last_range(), layout.range(0));
        let token = resolve_generation(token, 2, &view, &mut out[..], &Serial, &mut Tracer::none());
        assert_eq!(token.generation(), 1);
        assert_eq!(token.last_range(), layout.range(1));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "outside the first generation")]
    fn root_past_first_generation_panics_in_debug() {
        let locals = [LocalTransform::IDENTITY; 3];
        let parents = [ParentIndex::NONE; 3];
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 3];
        let mut tracer = Tracer::none();
        let token = seed_identity(&mut out[..]);
        let token = resolve_generation(token, 1, &view, &mut out[..], &Serial, &mut tracer);
        let _ = resolve_generation(token, 1, &view, &mut out[..], &Serial, &mut tracer);
    }

    #[test]
    #[should_panic(expected = "past the previous generation")]
    fn parent_in_current_generation_panics() {
        let locals = [LocalTransform::IDENTITY; 3];
        // Relative parent 1 from offset 0 is slot 1, which is being written.
        let parents = [ParentIndex::NONE, ParentIndex::NONE, ParentIndex::new(1)];
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 3];
        let token = seed_identity(&mut out[..]);
        let _ = resolve_generation(token, 2, &view, &mut out[..], &Serial, &mut Tracer::none());
    }

    #[test]
    #[should_panic(expected = "the store has")]
    fn short_store_panics() {
        let locals = [LocalTransform::IDENTITY; 4];
        let parents = [ParentIndex::NONE; 4];
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 2];
        let token = seed_identity(&mut out[..]);
        let _ = resolve_generation(token, 3, &view, &mut out[..], &Serial, &mut Tracer::none());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn batches_are_traced() {
        use alloc::vec::Vec;

        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Collect(Vec<BatchBeginEvent>);
        impl TraceSink for Collect {
            fn on_batch_begin(&mut self, e: &BatchBeginEvent) {
                self.0.push(*e);
            }
        }

        let locals = [LocalTransform::IDENTITY; 3];
        let parents = [ParentIndex::NONE; 3];
        let view = HierarchyView::new(&locals, &parents);
        let mut out = vec![Mat4::IDENTITY; 3];
        let mut sink = Collect::default();
        let mut tracer = Tracer::new(&mut sink);
        let token = seed_identity(&mut out[..]);
        let _ = resolve_generation(token, 2, &view, &mut out[..], &Serial, &mut tracer).finish();
        drop(tracer);

        assert_eq!(
            sink.0,
            [BatchBeginEvent {
                kind: BatchKind::Generation(1),
                offset_last: 0,
                offset_this: 1,
                len: 2,
            }]
        );
    }
}
