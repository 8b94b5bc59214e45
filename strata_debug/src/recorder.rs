// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each stamped with the
//! nanoseconds elapsed since the recorder was created. [`decode`] reads them
//! back as an iterator of [`RecordedEvent`].

use std::time::Instant;

use strata_core::trace::{BatchBeginEvent, BatchEndEvent, BatchKind, PassSummary, TraceSink};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_BATCH_BEGIN: u8 = 1;
const TAG_BATCH_END: u8 = 2;
const TAG_PASS_SUMMARY: u8 = 3;

const KIND_SEED: u8 = 0;
const KIND_GENERATION: u8 = 1;
const KIND_ROOT_WALK: u8 = 2;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug)]
pub struct RecorderSink {
    buf: Vec<u8>,
    origin: Instant,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder. Timestamps count from this call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            origin: Instant::now(),
        }
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_usize(&mut self, v: usize) {
        self.write_u64(v as u64);
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "recordings are shorter than 584 years"
    )]
    fn write_timestamp(&mut self) {
        let nanos = self.origin.elapsed().as_nanos() as u64;
        self.write_u64(nanos);
    }

    fn write_kind(&mut self, kind: BatchKind) {
        let (tag, generation) = match kind {
            BatchKind::Seed => (KIND_SEED, 0),
            BatchKind::Generation(g) => (KIND_GENERATION, g),
            BatchKind::RootWalk => (KIND_ROOT_WALK, 0),
        };
        self.write_u8(tag);
        self.write_u32(generation);
    }
}

impl TraceSink for RecorderSink {
    fn on_batch_begin(&mut self, e: &BatchBeginEvent) {
        self.write_u8(TAG_BATCH_BEGIN);
        self.write_timestamp();
        self.write_kind(e.kind);
        self.write_usize(e.offset_last);
        self.write_usize(e.offset_this);
        self.write_usize(e.len);
    }

    fn on_batch_end(&mut self, e: &BatchEndEvent) {
        self.write_u8(TAG_BATCH_END);
        self.write_timestamp();
        self.write_kind(e.kind);
        self.write_usize(e.written);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.write_u8(TAG_PASS_SUMMARY);
        self.write_timestamp();
        self.write_u32(s.generations_run);
        self.write_u32(s.generations_skipped);
        self.write_usize(s.nodes_resolved);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`BatchBeginEvent`].
    BatchBegin {
        /// Nanoseconds since the recorder was created.
        at_ns: u64,
        /// The event.
        event: BatchBeginEvent,
    },
    /// A [`BatchEndEvent`].
    BatchEnd {
        /// Nanoseconds since the recorder was created.
        at_ns: u64,
        /// The event.
        event: BatchEndEvent,
    },
    /// A [`PassSummary`].
    PassSummary {
        /// Nanoseconds since the recorder was created.
        at_ns: u64,
        /// The summary.
        summary: PassSummary,
    },
}

impl RecordedEvent {
    /// Nanoseconds since the recorder was created.
    #[must_use]
    pub fn at_ns(&self) -> u64 {
        match self {
            Self::BatchBegin { at_ns, .. }
            | Self::BatchEnd { at_ns, .. }
            | Self::PassSummary { at_ns, .. } => *at_ns,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the end of the data, at a truncated record, or at an unknown tag.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_usize(&mut self) -> Option<usize> {
        usize::try_from(self.read_u64()?).ok()
    }

    fn read_kind(&mut self) -> Option<BatchKind> {
        let tag = self.read_u8()?;
        let generation = self.read_u32()?;
        match tag {
            KIND_SEED => Some(BatchKind::Seed),
            KIND_GENERATION => Some(BatchKind::Generation(generation)),
            KIND_ROOT_WALK => Some(BatchKind::RootWalk),
            _ => None,
        }
    }

    fn decode_batch_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::BatchBegin {
            at_ns: self.read_u64()?,
            event: BatchBeginEvent {
                kind: self.read_kind()?,
                offset_last: self.read_usize()?,
                offset_this: self.read_usize()?,
                len: self.read_usize()?,
            },
        })
    }

    fn decode_batch_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::BatchEnd {
            at_ns: self.read_u64()?,
            event: BatchEndEvent {
                kind: self.read_kind()?,
                written: self.read_usize()?,
            },
        })
    }

    fn decode_pass_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassSummary {
            at_ns: self.read_u64()?,
            summary: PassSummary {
                generations_run: self.read_u32()?,
                generations_skipped: self.read_u32()?,
                nodes_resolved: self.read_usize()?,
            },
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_BATCH_BEGIN => self.decode_batch_begin(),
            TAG_BATCH_END => self.decode_batch_end(),
            TAG_PASS_SUMMARY => self.decode_pass_summary(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> BatchBeginEvent {
        BatchBeginEvent {
            kind: BatchKind::Generation(3),
            offset_last: 10,
            offset_this: 20,
            len: 40,
        }
    }

    #[test]
    fn round_trip_batch_events() {
        let mut rec = RecorderSink::new();
        rec.on_batch_begin(&sample_begin());
        rec.on_batch_end(&BatchEndEvent {
            kind: BatchKind::Generation(3),
            written: 40,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::BatchBegin { event, .. } => assert_eq!(*event, sample_begin()),
            other => panic!("expected BatchBegin, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::BatchEnd { event, .. } => {
                assert_eq!(event.kind, BatchKind::Generation(3));
                assert_eq!(event.written, 40);
            }
            other => panic!("expected BatchEnd, got {other:?}"),
        }
        assert!(events[0].at_ns() <= events[1].at_ns());
    }

    #[test]
    fn round_trip_summary_and_kinds() {
        let mut rec = RecorderSink::new();
        for kind in [BatchKind::Seed, BatchKind::RootWalk] {
            rec.on_batch_end(&BatchEndEvent { kind, written: 1 });
        }
        let summary = PassSummary {
            generations_run: 4,
            generations_skipped: 2,
            nodes_resolved: 1024,
        };
        rec.on_pass_summary(&summary);

        let events: Vec<_> = decode(&rec.into_bytes()).collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[0],
            RecordedEvent::BatchEnd {
                event: BatchEndEvent {
                    kind: BatchKind::Seed,
                    ..
                },
                ..
            }
        ));
        assert!(matches!(
            events[1],
            RecordedEvent::BatchEnd {
                event: BatchEndEvent {
                    kind: BatchKind::RootWalk,
                    ..
                },
                ..
            }
        ));
        match &events[2] {
            RecordedEvent::PassSummary { summary: s, .. } => assert_eq!(*s, summary),
            other => panic!("expected PassSummary, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_batch_begin(&sample_begin());
        rec.on_batch_begin(&sample_begin());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let events: Vec<_> = decode(&[0xFF, 1, 2, 3]).collect();
        assert!(events.is_empty());
    }
}
