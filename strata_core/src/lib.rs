// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-parallel world-transform resolution for parent-linked hierarchies.
//!
//! `strata_core` turns per-node local transforms (uniform scale, rotation
//! quaternion, translation) into column-major world matrices. Work is expressed
//! as batches of independent work-items, one per node, that each write exactly
//! one output slot, so a batch can be spread over as many compute units as are
//! available. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   &[LocalTransform] + &[ParentIndex]  (HierarchyView)
//!                 │
//!        ┌────────┴─────────┐
//!        ▼                  ▼
//!   root walk          seed_identity ──► GenerationToken
//!   (Strategy A)                              │
//!        │              resolve_generation ◄──┘  (one batch per depth level,
//!        │                      │                 token N feeds batch N+1)
//!        ▼                      ▼
//!   MatrixStore ◄───────── MatrixStore
//!   ([Mat4] or ColumnMatrices)
//! ```
//!
//! **[`math`]** — `Vec3`, `Vec4`, `Quat`, and the column-major [`Mat4`](math::Mat4)
//! with its composition product.
//!
//! **[`transform`]** — [`LocalTransform`](transform::LocalTransform) and its
//! conversion to a matrix.
//!
//! **[`hierarchy`]** — [`ParentIndex`](hierarchy::ParentIndex) and the read-only
//! [`HierarchyView`](hierarchy::HierarchyView) consumed by both resolvers.
//!
//! **[`store`]** — The [`MatrixStore`](store::MatrixStore) capability with packed
//! (`[Mat4]`) and per-column ([`ColumnMatrices`](store::ColumnMatrices)) adapters.
//!
//! **[`exec`]** — [`Executor`](exec::Executor)s that run the work-items of one
//! batch, serially or on the rayon pool.
//!
//! **[`resolve`]** — The two resolution strategies: the independent root walk and
//! the generation-ordered resolver with its completion tokens.
//!
//! **[`schedule`]** — Generation layouts, whole-pass resolution, and dirty
//! tracking for incremental passes.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for batch
//! instrumentation, with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `parallel` (disabled by default, implies `std`): Enables the
//!   [`Rayon`](exec::Rayon) executor.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod dirty;
pub mod exec;
pub mod hierarchy;
pub mod math;
pub mod resolve;
pub mod schedule;
pub mod store;
pub mod trace;
pub mod transform;
