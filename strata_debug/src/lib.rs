// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for strata resolve passes.
//!
//! This crate provides [`TraceSink`](strata_core::trace::TraceSink)
//! implementations and tools for inspecting resolver behavior:
//!
//! - [`recorder::RecorderSink`]: records events into a compact binary buffer.
//! - [`chrome::export`]: converts a recording to Chrome Trace Event Format JSON.
//! - [`pretty::PrettyPrintSink`]: writes one human-readable line per event.

pub mod chrome;
pub mod pretty;
pub mod recorder;
