// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Batch end
//! lines include the wall-clock time since the matching begin.

use std::io::Write;
use std::time::Instant;

use strata_core::trace::{BatchBeginEvent, BatchEndEvent, BatchKind, PassSummary, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    batch_started: Option<Instant>,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("batch_started", &self.batch_started)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            batch_started: None,
        }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub(crate) fn kind_name(kind: BatchKind) -> String {
    match kind {
        BatchKind::Seed => "seed".to_owned(),
        BatchKind::Generation(g) => format!("gen{g}"),
        BatchKind::RootWalk => "root-walk".to_owned(),
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_batch_begin(&mut self, e: &BatchBeginEvent) {
        self.batch_started = Some(Instant::now());
        let _ = writeln!(
            self.writer,
            "[batch:begin] {} parents@{} slots={}..{}",
            kind_name(e.kind),
            e.offset_last,
            e.offset_this,
            e.offset_this + e.len,
        );
    }

    fn on_batch_end(&mut self, e: &BatchEndEvent) {
        let elapsed_us = self
            .batch_started
            .take()
            .map_or(0.0, |t| t.elapsed().as_secs_f64() * 1e6);
        let _ = writeln!(
            self.writer,
            "[batch:end] {} written={} in {elapsed_us:.1}µs",
            kind_name(e.kind),
            e.written,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] generations={} skipped={} nodes={}",
            s.generations_run, s.generations_skipped, s.nodes_resolved,
        );
    }
}
