// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent links and the read-only hierarchy view shared by both resolvers.

use core::fmt;

use bytemuck::{Pod, Zeroable};

use crate::transform::LocalTransform;

/// Optional reference to a node's parent.
///
/// Stored as a bare `u32` so a parent array can be uploaded directly, with
/// `u32::MAX` reserved to mean "no parent". Only roots carry that value.
///
/// The index is absolute for the root walk. For generation batches it is
/// relative to the start of the previous generation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct ParentIndex(u32);

impl ParentIndex {
    /// Raw value reserved for "no parent".
    pub const SENTINEL: u32 = u32::MAX;

    /// The parent link of a root.
    pub const NONE: Self = Self(Self::SENTINEL);

    /// Links to the parent at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is [`SENTINEL`](Self::SENTINEL).
    #[inline]
    #[must_use]
    pub const fn new(idx: u32) -> Self {
        assert!(idx != Self::SENTINEL, "u32::MAX is reserved for roots");
        Self(idx)
    }

    /// The parent link of a root. Same as [`NONE`](Self::NONE).
    #[inline]
    #[must_use]
    pub const fn root() -> Self {
        Self::NONE
    }

    /// Returns the parent index, or `None` for a root.
    #[inline]
    #[must_use]
    pub const fn get(self) -> Option<u32> {
        if self.0 == Self::SENTINEL {
            None
        } else {
            Some(self.0)
        }
    }

    /// Is this the link of a root?
    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == Self::SENTINEL
    }

    /// Returns the raw stored value, sentinel included.
    #[inline]
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl Default for ParentIndex {
    #[inline]
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Option<u32>> for ParentIndex {
    /// # Panics
    ///
    /// Panics on `Some(u32::MAX)`.
    #[inline]
    fn from(parent: Option<u32>) -> Self {
        parent.map_or(Self::NONE, Self::new)
    }
}

impl From<ParentIndex> for Option<u32> {
    #[inline]
    fn from(parent: ParentIndex) -> Self {
        parent.get()
    }
}

impl fmt::Debug for ParentIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(idx) => write!(f, "ParentIndex({idx})"),
            None => f.write_str("ParentIndex(root)"),
        }
    }
}

/// Read-only view of one node set: local transforms and parent links, indexed
/// in parallel.
#[derive(Clone, Copy, Debug)]
pub struct HierarchyView<'a> {
    locals: &'a [LocalTransform],
    parents: &'a [ParentIndex],
}

impl<'a> HierarchyView<'a> {
    /// Pairs local transforms with their parent links.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length.
    #[must_use]
    pub fn new(locals: &'a [LocalTransform], parents: &'a [ParentIndex]) -> Self {
        assert_eq!(
            locals.len(),
            parents.len(),
            "every node needs exactly one local transform and one parent link"
        );
        Self { locals, parents }
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.locals.len()
    }

    /// Returns `true` if there are no nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }

    /// Local transform of node `idx`.
    #[inline]
    #[must_use]
    pub fn local(&self, idx: usize) -> &'a LocalTransform {
        &self.locals[idx]
    }

    /// Parent link of node `idx`.
    #[inline]
    #[must_use]
    pub fn parent(&self, idx: usize) -> ParentIndex {
        self.parents[idx]
    }

    /// All local transforms.
    #[inline]
    #[must_use]
    pub fn locals(&self) -> &'a [LocalTransform] {
        self.locals
    }

    /// All parent links.
    #[inline]
    #[must_use]
    pub fn parents(&self) -> &'a [ParentIndex] {
        self.parents
    }
}
