// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing for resolution passes.
//!
//! Resolvers report each batch they run to a [`TraceSink`]. All sink methods
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! [`PassSummaryBuilder`] counts batches during a pass and produces the
//! [`PassSummary`] emitted at its end.

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which kind of batch is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Writing identity into the seed slot.
    Seed,
    /// One depth level of the generation resolver, numbered from 1 since
    /// generation 0 is the seed slot.
    Generation(u32),
    /// One launch of the root-walk resolver.
    RootWalk,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted before a batch's work-items are dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchBeginEvent {
    /// What is running.
    pub kind: BatchKind,
    /// First slot of the parent range (0 for seed and root-walk batches).
    pub offset_last: usize,
    /// First slot written by the batch.
    pub offset_this: usize,
    /// Number of work-items.
    pub len: usize,
}

/// Emitted after every work-item of a batch has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchEndEvent {
    /// What ran.
    pub kind: BatchKind,
    /// Number of slots written.
    pub written: usize,
}

/// Per-pass totals produced by [`PassSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Generation batches that ran.
    pub generations_run: u32,
    /// Clean generations that were reused without running.
    pub generations_skipped: u32,
    /// Slots written across all batches.
    pub nodes_resolved: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the resolvers.
///
/// All methods have default no-op implementations.
pub trait TraceSink {
    /// Called before a batch runs.
    fn on_batch_begin(&mut self, e: &BatchBeginEvent) {
        _ = e;
    }

    /// Called after a batch has completed.
    fn on_batch_end(&mut self, e: &BatchEndEvent) {
        _ = e;
    }

    /// Called once at the end of a full or incremental pass.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`BatchBeginEvent`].
    #[inline]
    pub fn batch_begin(&mut self, e: &BatchBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_batch_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BatchEndEvent`].
    #[inline]
    pub fn batch_end(&mut self, e: &BatchEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_batch_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

impl Default for Tracer<'_> {
    #[inline]
    fn default() -> Self {
        Self::none()
    }
}

// ---------------------------------------------------------------------------
// PassSummaryBuilder
// ---------------------------------------------------------------------------

/// Counts batches during a pass and produces a [`PassSummary`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PassSummaryBuilder {
    summary: PassSummary,
}

impl PassSummaryBuilder {
    /// Starts an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed batch of `written` slots.
    pub fn batch(&mut self, kind: BatchKind, written: usize) {
        if let BatchKind::Generation(_) = kind {
            self.summary.generations_run += 1;
        }
        self.summary.nodes_resolved += written;
    }

    /// Records `count` generations reused without running.
    pub fn skipped(&mut self, count: u32) {
        self.summary.generations_skipped += count;
    }

    /// Consumes the builder and produces the final [`PassSummary`].
    #[must_use]
    pub fn finish(self) -> PassSummary {
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
