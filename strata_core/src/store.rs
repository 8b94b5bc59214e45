// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World-matrix storage.
//!
//! Resolvers are written once against [`MatrixStore`] and work with either
//! layout:
//!
//! - `[Mat4]`: packed, one 64-byte matrix per slot.
//! - [`ColumnMatrices`]: four parallel [`Vec4`] arrays, one per matrix column.
//!
//! A batch never writes a slot it reads. [`MatrixStore::split_at_slot`] hands
//! out the already-resolved prefix as a shared [`MatrixView`] and the rest as
//! exclusive [`MatrixSlots`], which can be split further or filled in
//! parallel.

use alloc::vec::Vec;

#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::math::{Mat4, Vec4};

/// Read/write access to a store of world matrices.
pub trait MatrixStore {
    /// Shared view of a resolved prefix.
    type View<'a>: MatrixView + Sync
    where
        Self: 'a;

    /// Exclusive view of a writable suffix.
    type Slots<'a>: MatrixSlots
    where
        Self: 'a;

    /// Number of slots.
    fn len(&self) -> usize;

    /// Returns `true` if the store has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    fn load(&self, idx: usize) -> Mat4;

    /// Overwrites slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    fn write(&mut self, idx: usize, m: Mat4);

    /// Splits into `[0, mid)` (read-only) and `[mid, len)` (writable).
    ///
    /// # Panics
    ///
    /// Panics if `mid > self.len()`.
    fn split_at_slot(&mut self, mid: usize) -> (Self::View<'_>, Self::Slots<'_>);
}

/// Shared, read-only access to a run of resolved matrices.
pub trait MatrixView {
    /// Number of slots.
    fn len(&self) -> usize;

    /// Returns `true` if the view has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads slot `idx`, relative to the start of the view.
    fn load(&self, idx: usize) -> Mat4;
}

/// Exclusive access to a run of output slots.
pub trait MatrixSlots: Sized + Send {
    /// Number of slots.
    fn len(&self) -> usize;

    /// Returns `true` if there are no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splits into `[0, mid)` and `[mid, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `mid > self.len()`.
    fn split_slots(self, mid: usize) -> (Self, Self);

    /// Writes `f(i)` into slot `i` for every slot, in index order.
    fn fill_indexed<F: Fn(usize) -> Mat4>(self, f: F);

    /// Writes `f(i)` into slot `i` for every slot on the rayon pool, giving
    /// each task at least `min_len` consecutive slots.
    ///
    /// The default runs [`fill_indexed`](Self::fill_indexed) on the calling
    /// thread.
    #[cfg(feature = "parallel")]
    fn par_fill_indexed<F: Fn(usize) -> Mat4 + Sync + Send>(self, min_len: usize, f: F) {
        let _ = min_len;
        self.fill_indexed(f);
    }
}

// ---------------------------------------------------------------------------
// Packed
// ---------------------------------------------------------------------------

impl MatrixStore for [Mat4] {
    type View<'a>
        = &'a [Mat4]
    where
        Self: 'a;
    type Slots<'a>
        = &'a mut [Mat4]
    where
        Self: 'a;

    #[inline]
    fn len(&self) -> usize {
        <[Mat4]>::len(self)
    }

    #[inline]
    fn load(&self, idx: usize) -> Mat4 {
        self[idx]
    }

    #[inline]
    fn write(&mut self, idx: usize, m: Mat4) {
        self[idx] = m;
    }

    fn split_at_slot(&mut self, mid: usize) -> (&[Mat4], &mut [Mat4]) {
        let (resolved, pending) = <[Mat4]>::split_at_mut(self, mid);
        (resolved, pending)
    }
}

impl MatrixView for &[Mat4] {
    #[inline]
    fn len(&self) -> usize {
        <[Mat4]>::len(self)
    }

    #[inline]
    fn load(&self, idx: usize) -> Mat4 {
        self[idx]
    }
}

impl MatrixSlots for &mut [Mat4] {
    #[inline]
    fn len(&self) -> usize {
        <[Mat4]>::len(self)
    }

    #[inline]
    fn split_slots(self, mid: usize) -> (Self, Self) {
        <[Mat4]>::split_at_mut(self, mid)
    }

    fn fill_indexed<F: Fn(usize) -> Mat4>(self, f: F) {
        for (i, slot) in self.iter_mut().enumerate() {
            *slot = f(i);
        }
    }

    #[cfg(feature = "parallel")]
    fn par_fill_indexed<F: Fn(usize) -> Mat4 + Sync + Send>(self, min_len: usize, f: F) {
        self.into_par_iter()
            .with_min_len(min_len)
            .enumerate()
            .for_each(|(i, slot)| *slot = f(i));
    }
}

/// Reinterprets packed matrices as bytes for upload.
#[inline]
#[must_use]
pub fn as_bytes(mats: &[Mat4]) -> &[u8] {
    bytemuck::cast_slice(mats)
}

// ---------------------------------------------------------------------------
// Per-column
// ---------------------------------------------------------------------------

/// A matrix store split into four column arrays.
///
/// Slot `i` is the matrix with columns `x[i]`, `y[i]`, `z[i]`, `w[i]`.
#[derive(Debug)]
pub struct ColumnMatrices<'a> {
    x: &'a mut [Vec4],
    y: &'a mut [Vec4],
    z: &'a mut [Vec4],
    w: &'a mut [Vec4],
}

impl<'a> ColumnMatrices<'a> {
    /// Wraps four column arrays.
    ///
    /// # Panics
    ///
    /// Panics if the arrays differ in length.
    #[must_use]
    pub fn new(
        x: &'a mut [Vec4],
        y: &'a mut [Vec4],
        z: &'a mut [Vec4],
        w: &'a mut [Vec4],
    ) -> Self {
        let len = x.len();
        assert!(
            y.len() == len && z.len() == len && w.len() == len,
            "column arrays must have equal lengths (x: {}, y: {}, z: {}, w: {})",
            len,
            y.len(),
            z.len(),
            w.len(),
        );
        Self { x, y, z, w }
    }

    /// Reads the whole store back as packed matrices.
    #[must_use]
    pub fn to_packed(&self) -> Vec<Mat4> {
        (0..self.x.len()).map(|i| self.load(i)).collect()
    }

    /// Reinterprets each column array as bytes for upload, in `x, y, z, w`
    /// order.
    #[must_use]
    pub fn column_bytes(&self) -> [&[u8]; 4] {
        [
            bytemuck::cast_slice(self.x),
            bytemuck::cast_slice(self.y),
            bytemuck::cast_slice(self.z),
            bytemuck::cast_slice(self.w),
        ]
    }
}

impl MatrixStore for ColumnMatrices<'_> {
    type View<'a>
        = ColumnView<'a>
    where
        Self: 'a;
    type Slots<'a>
        = ColumnSlots<'a>
    where
        Self: 'a;

    #[inline]
    fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    fn load(&self, idx: usize) -> Mat4 {
        Mat4::from_cols(self.x[idx], self.y[idx], self.z[idx], self.w[idx])
    }

    #[inline]
    fn write(&mut self, idx: usize, m: Mat4) {
        self.x[idx] = m.x;
        self.y[idx] = m.y;
        self.z[idx] = m.z;
        self.w[idx] = m.w;
    }

    fn split_at_slot(&mut self, mid: usize) -> (ColumnView<'_>, ColumnSlots<'_>) {
        let (x0, x1) = self.x.split_at_mut(mid);
        let (y0, y1) = self.y.split_at_mut(mid);
        let (z0, z1) = self.z.split_at_mut(mid);
        let (w0, w1) = self.w.split_at_mut(mid);
        (
            ColumnView {
                x: x0,
                y: y0,
                z: z0,
                w: w0,
            },
            ColumnSlots {
                x: x1,
                y: y1,
                z: z1,
                w: w1,
            },
        )
    }
}

/// Read-only prefix of a [`ColumnMatrices`].
#[derive(Clone, Copy, Debug)]
pub struct ColumnView<'a> {
    x: &'a [Vec4],
    y: &'a [Vec4],
    z: &'a [Vec4],
    w: &'a [Vec4],
}

impl MatrixView for ColumnView<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    fn load(&self, idx: usize) -> Mat4 {
        Mat4::from_cols(self.x[idx], self.y[idx], self.z[idx], self.w[idx])
    }
}

/// Writable run of a [`ColumnMatrices`].
#[derive(Debug)]
pub struct ColumnSlots<'a> {
    x: &'a mut [Vec4],
    y: &'a mut [Vec4],
    z: &'a mut [Vec4],
    w: &'a mut [Vec4],
}

impl MatrixSlots for ColumnSlots<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.x.len()
    }

    fn split_slots(self, mid: usize) -> (Self, Self) {
        let (x0, x1) = self.x.split_at_mut(mid);
        let (y0, y1) = self.y.split_at_mut(mid);
        let (z0, z1) = self.z.split_at_mut(mid);
        let (w0, w1) = self.w.split_at_mut(mid);
        (
            ColumnSlots {
                x: x0,
                y: y0,
                z: z0,
                w: w0,
            },
            ColumnSlots {
                x: x1,
                y: y1,
                z: z1,
                w: w1,
            },
        )
    }

    fn fill_indexed<F: Fn(usize) -> Mat4>(self, f: F) {
        let cols = self.x.iter_mut().zip(self.y).zip(self.z).zip(self.w);
        for (i, (((x, y), z), w)) in cols.enumerate() {
            let m = f(i);
            *x = m.x;
            *y = m.y;
            *z = m.z;
            *w = m.w;
        }
    }

    #[cfg(feature = "parallel")]
    fn par_fill_indexed<F: Fn(usize) -> Mat4 + Sync + Send>(self, min_len: usize, f: F) {
        (self.x, self.y, self.z, self.w)
            .into_par_iter()
            .with_min_len(min_len)
            .enumerate()
            .for_each(|(i, (x, y, z, w))| {
                let m = f(i);
                *x = m.x;
                *y = m.y;
                *z = m.z;
                *w = m.w;
            });
    }
}
