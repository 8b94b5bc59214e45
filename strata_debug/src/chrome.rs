// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//! Batches become `B`/`E` duration pairs; pass summaries become instants.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::pretty::kind_name;
use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::BatchBegin { at_ns, event: e } => {
                events.push(json!({
                    "ph": "B",
                    "name": kind_name(e.kind),
                    "cat": "Resolve",
                    "ts": nanos_to_us(at_ns),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "offset_last": e.offset_last,
                        "offset_this": e.offset_this,
                        "len": e.len,
                    }
                }));
            }
            RecordedEvent::BatchEnd { at_ns, event: e } => {
                events.push(json!({
                    "ph": "E",
                    "name": kind_name(e.kind),
                    "cat": "Resolve",
                    "ts": nanos_to_us(at_ns),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "written": e.written,
                    }
                }));
            }
            RecordedEvent::PassSummary { at_ns, summary: s } => {
                events.push(json!({
                    "ph": "i",
                    "name": "PassSummary",
                    "cat": "Resolve",
                    "ts": nanos_to_us(at_ns),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "generations_run": s.generations_run,
                        "generations_skipped": s.generations_skipped,
                        "nodes_resolved": s.nodes_resolved,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn nanos_to_us(nanos: u64) -> f64 {
    nanos as f64 / 1000.0
}
