// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch executors.
//!
//! An [`Executor`] runs every work-item of one batch and returns only after
//! all of them have written their slot. That return is the barrier between
//! dependent batches.

use crate::math::Mat4;
use crate::store::MatrixSlots;

/// Runs the work-items of a batch.
pub trait Executor {
    /// Writes `f(i)` into slot `i` of `slots`, for every slot.
    ///
    /// Work-items must not depend on each other; they may run in any order
    /// and concurrently.
    fn fill<S, F>(&self, slots: S, f: F)
    where
        S: MatrixSlots,
        F: Fn(usize) -> Mat4 + Sync + Send;
}

/// Runs work-items one after another on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct Serial;

impl Executor for Serial {
    #[inline]
    fn fill<S, F>(&self, slots: S, f: F)
    where
        S: MatrixSlots,
        F: Fn(usize) -> Mat4 + Sync + Send,
    {
        slots.fill_indexed(f);
    }
}

/// Runs work-items on the global rayon thread pool.
#[cfg(feature = "parallel")]
#[derive(Clone, Copy, Debug)]
pub struct Rayon {
    min_len: usize,
}

#[cfg(feature = "parallel")]
impl Rayon {
    /// Minimum work-items per task used by [`Rayon::new`].
    pub const DEFAULT_MIN_LEN: usize = 64;

    /// Creates an executor with [`DEFAULT_MIN_LEN`](Self::DEFAULT_MIN_LEN).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_len: Self::DEFAULT_MIN_LEN,
        }
    }

    /// Sets the minimum number of consecutive work-items a single task
    /// processes. Values below 1 are clamped to 1.
    #[must_use]
    pub const fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = if min_len == 0 { 1 } else { min_len };
        self
    }

    /// Returns the configured minimum task length.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        self.min_len
    }
}

#[cfg(feature = "parallel")]
impl Default for Rayon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "parallel")]
impl Executor for Rayon {
    #[inline]
    fn fill<S, F>(&self, slots: S, f: F)
    where
        S: MatrixSlots,
        F: Fn(usize) -> Mat4 + Sync + Send,
    {
        slots.par_fill_indexed(self.min_len, f);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::math::Vec3;

    fn translate(i: usize) -> Mat4 {
        Mat4::from_translation(Vec3::new(i as f32, 0.0, 0.0))
    }

    #[test]
    fn serial_fills_every_slot() {
        let mut mats = vec![Mat4::IDENTITY; 4];
        Serial.fill(mats.as_mut_slice(), translate);
        for (i, m) in mats.iter().enumerate() {
            assert_eq!(*m, translate(i));
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn min_len_is_clamped() {
        assert_eq!(Rayon::new().with_min_len(0).min_len(), 1);
        assert_eq!(Rayon::default().min_len(), Rayon::DEFAULT_MIN_LEN);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn rayon_matches_serial() {
        let mut serial = vec![Mat4::IDENTITY; 777];
        let mut parallel = vec![Mat4::IDENTITY; 777];
        Serial.fill(serial.as_mut_slice(), translate);
        Rayon::new()
            .with_min_len(8)
            .fill(parallel.as_mut_slice(), translate);
        assert_eq!(serial, parallel);
    }
}
