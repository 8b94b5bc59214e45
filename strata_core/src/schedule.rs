// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation layouts and whole-pass scheduling.
//!
//! A [`GenerationLayout`] describes how a depth-sorted store is cut into
//! generations. Generation 0 is always the single seed slot `[0, 1)`; every
//! following generation is the contiguous range right after its predecessor.
//!
//! [`resolve_layout`] runs a complete pass over a layout. [`GenerationSchedule`]
//! adds per-generation dirty tracking so a pass only re-runs the generations
//! that changed and everything below them.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::dirty;
use crate::exec::Executor;
use crate::hierarchy::{HierarchyView, ParentIndex};
use crate::resolve::generation::{
    GenerationToken, PassComplete, resolve_generation, seed_identity,
};
use crate::store::MatrixStore;
use crate::trace::{BatchBeginEvent, BatchEndEvent, BatchKind, PassSummaryBuilder, Tracer};

/// Errors from converting absolute parent links with
/// [`GenerationLayout::to_relative`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// The parent array does not cover exactly the layout's slots.
    LengthMismatch {
        /// Slots in the layout, seed included.
        expected: usize,
        /// Entries in the parent array.
        found: usize,
    },
    /// A root sits outside generation 1.
    MisplacedRoot {
        /// Slot of the root.
        slot: usize,
    },
    /// A parent link does not point into the previous generation.
    ParentOutsidePreviousGeneration {
        /// Slot of the child.
        slot: usize,
        /// Absolute slot of its parent.
        parent: u32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { expected, found } => {
                write!(f, "expected {expected} parent links, found {found}")
            }
            Self::MisplacedRoot { slot } => {
                write!(f, "root at slot {slot} is not in the first generation")
            }
            Self::ParentOutsidePreviousGeneration { slot, parent } => write!(
                f,
                "parent {parent} of slot {slot} is not in the previous generation"
            ),
        }
    }
}

impl core::error::Error for LayoutError {}

// ---------------------------------------------------------------------------
// GenerationLayout
// ---------------------------------------------------------------------------

/// Slot ranges of the generations of a depth-sorted store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationLayout {
    ranges: Vec<Range<usize>>,
}

impl Default for GenerationLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationLayout {
    /// A layout holding only the seed generation.
    #[must_use]
    pub fn new() -> Self {
        Self { ranges: vec![0..1] }
    }

    /// Builds a layout from the lengths of generations `1, 2, …`.
    #[must_use]
    pub fn from_lengths<I: IntoIterator<Item = usize>>(lengths: I) -> Self {
        let mut layout = Self::new();
        for len in lengths {
            layout.push_generation(len);
        }
        layout
    }

    /// Appends a generation of `len` slots and returns its number.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "generations are bounded by the u32 parent index space"
    )]
    pub fn push_generation(&mut self, len: usize) -> u32 {
        let start = self.node_count();
        self.ranges.push(start..start + len);
        (self.ranges.len() - 1) as u32
    }

    /// Total number of slots, seed included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ranges.last().map_or(0, |r| r.end)
    }

    /// Number of generations, seed included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if the layout has no generation besides the seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.len() <= 1
    }

    /// Slot range of generation `g`.
    ///
    /// # Panics
    ///
    /// Panics if `g >= self.len()`.
    #[must_use]
    pub fn range(&self, g: u32) -> Range<usize> {
        let g = g as usize;
        assert!(
            g < self.ranges.len(),
            "generation {g} out of range (layout has {})",
            self.ranges.len()
        );
        self.ranges[g].clone()
    }

    /// All ranges, generation 0 first.
    #[must_use]
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Generation that contains `slot`, if any.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "generations are bounded by the u32 parent index space"
    )]
    pub fn generation_of(&self, slot: usize) -> Option<u32> {
        if slot >= self.node_count() {
            return None;
        }
        let g = self.ranges.partition_point(|r| r.end <= slot);
        Some(g as u32)
    }

    /// Converts absolute parent links into the batch-relative links the
    /// generation resolver reads.
    ///
    /// `abs_parents[slot]` is the absolute parent slot of the node stored at
    /// `slot`. Roots must be in generation 1, where they get the root link.
    /// Every other node's parent must be in the generation directly before its
    /// own, and becomes an index relative to that generation's first slot.
    /// The seed slot's entry is ignored and comes back as a root link.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] naming the first slot that breaks these rules.
    pub fn to_relative(
        &self,
        abs_parents: &[ParentIndex],
    ) -> Result<Vec<ParentIndex>, LayoutError> {
        if abs_parents.len() != self.node_count() {
            return Err(LayoutError::LengthMismatch {
                expected: self.node_count(),
                found: abs_parents.len(),
            });
        }

        let mut relative = vec![ParentIndex::NONE; abs_parents.len()];
        for (g, pair) in self.ranges.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            for slot in current.clone() {
                relative[slot] = match abs_parents[slot].get() {
                    None if g == 0 => ParentIndex::NONE,
                    None => return Err(LayoutError::MisplacedRoot { slot }),
                    Some(parent) if previous.contains(&(parent as usize)) => {
                        #[expect(
                            clippy::cast_possible_truncation,
                            reason = "the offset is smaller than a u32 parent index"
                        )]
                        let rel = (parent as usize - previous.start) as u32;
                        ParentIndex::new(rel)
                    }
                    Some(parent) => {
                        return Err(LayoutError::ParentOutsidePreviousGeneration { slot, parent });
                    }
                };
            }
        }
        Ok(relative)
    }
}

// ---------------------------------------------------------------------------
// Whole-pass resolution
// ---------------------------------------------------------------------------

fn seed<S>(
    out: &mut S,
    tracer: &mut Tracer<'_>,
    summary: &mut PassSummaryBuilder,
) -> GenerationToken
where
    S: MatrixStore + ?Sized,
{
    tracer.batch_begin(&BatchBeginEvent {
        kind: BatchKind::Seed,
        offset_last: 0,
        offset_this: 0,
        len: 1,
    });
    let token = seed_identity(out);
    tracer.batch_end(&BatchEndEvent {
        kind: BatchKind::Seed,
        written: 1,
    });
    summary.batch(BatchKind::Seed, 1);
    token
}

/// Runs every generation of `layout` after the one `token` covers.
fn run_after<S, E>(
    layout: &GenerationLayout,
    mut token: GenerationToken,
    hierarchy: &HierarchyView<'_>,
    out: &mut S,
    executor: &E,
    tracer: &mut Tracer<'_>,
    summary: &mut PassSummaryBuilder,
) -> PassComplete
where
    S: MatrixStore + ?Sized,
    E: Executor,
{
    let next = token.generation() as usize + 1;
    for range in &layout.ranges()[next..] {
        token = resolve_generation(token, range.len(), hierarchy, out, executor, tracer);
        summary.batch(BatchKind::Generation(token.generation()), range.len());
    }
    token.finish()
}

/// Resolves every generation of `layout`: seed, then generations in order.
///
/// `hierarchy` is indexed by slot and carries batch-relative parent links
/// (see [`GenerationLayout::to_relative`]). Its seed entry is never read.
///
/// # Panics
///
/// Panics if the hierarchy or the store is shorter than
/// [`layout.node_count()`](GenerationLayout::node_count).
pub fn resolve_layout<S, E>(
    layout: &GenerationLayout,
    hierarchy: &HierarchyView<'_>,
    out: &mut S,
    executor: &E,
    tracer: &mut Tracer<'_>,
) -> PassComplete
where
    S: MatrixStore + ?Sized,
    E: Executor,
{
    let mut summary = PassSummaryBuilder::new();
    let token = seed(out, tracer, &mut summary);
    let done = run_after(layout, token, hierarchy, out, executor, tracer, &mut summary);
    tracer.pass_summary(&summary.finish());
    done
}

// ---------------------------------------------------------------------------
// GenerationSchedule
// ---------------------------------------------------------------------------

/// A [`GenerationLayout`] with per-generation dirty tracking.
///
/// Generations start dirty. [`resolve_dirty`](Self::resolve_dirty) re-runs
/// from the shallowest dirty generation to the deepest and keeps the
/// already-resolved prefix.
#[derive(Debug)]
pub struct GenerationSchedule {
    layout: GenerationLayout,
    dirty: DirtyTracker<u32>,
}

impl Default for GenerationSchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationSchedule {
    /// A schedule with only the seed generation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: GenerationLayout::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    /// A schedule over `layout` with every generation dirty.
    #[must_use]
    pub fn from_layout(layout: &GenerationLayout) -> Self {
        let mut schedule = Self::new();
        for range in &layout.ranges()[1..] {
            schedule.push_generation(range.len());
        }
        schedule
    }

    /// The current layout.
    #[must_use]
    pub fn layout(&self) -> &GenerationLayout {
        &self.layout
    }

    /// Appends a dirty generation of `len` slots and returns its number.
    pub fn push_generation(&mut self, len: usize) -> u32 {
        let g = self.layout.push_generation(len);
        if g > 1 {
            let _ = self.dirty.add_dependency(g, g - 1, dirty::TRANSFORM);
        }
        self.dirty.mark_with(g, dirty::TRANSFORM, &EagerPolicy);
        g
    }

    /// Marks generation `g`, and with it every deeper generation, dirty.
    ///
    /// # Panics
    ///
    /// Panics if `g` is 0 (the seed never changes) or not in the layout.
    pub fn mark_dirty(&mut self, g: u32) {
        assert!(g != 0, "the seed generation cannot be marked dirty");
        assert!(
            (g as usize) < self.layout.len(),
            "generation {g} out of range (layout has {})",
            self.layout.len()
        );
        self.dirty.mark_with(g, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Re-runs every generation from the shallowest dirty one onwards and
    /// clears the dirty state.
    ///
    /// Returns `None` without touching `out` when nothing is dirty. When
    /// generation 1 is dirty the seed is rewritten too; otherwise slots before
    /// the first dirty generation must still hold the previous pass's
    /// matrices.
    ///
    /// # Panics
    ///
    /// Panics if the hierarchy or the store is shorter than the layout.
    pub fn resolve_dirty<S, E>(
        &mut self,
        hierarchy: &HierarchyView<'_>,
        out: &mut S,
        executor: &E,
        tracer: &mut Tracer<'_>,
    ) -> Option<PassComplete>
    where
        S: MatrixStore + ?Sized,
        E: Executor,
    {
        let first = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .min()?;

        let mut summary = PassSummaryBuilder::new();
        let token = if first <= 1 {
            seed(out, tracer, &mut summary)
        } else {
            summary.skipped(first - 1);
            GenerationToken::resume(&self.layout, first - 1)
        };
        let done = run_after(
            &self.layout,
            token,
            hierarchy,
            out,
            executor,
            tracer,
            &mut summary,
        );
        tracer.pass_summary(&summary.finish());
        Some(done)
    }
}
