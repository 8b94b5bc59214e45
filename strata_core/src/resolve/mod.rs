// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World-matrix resolution strategies.
//!
//! - [`root_walk`]: every node walks its own ancestor chain. Work-items are
//!   fully independent, so one launch covers every node, at the cost of
//!   recomposing shared ancestors once per descendant.
//! - [`generation`]: nodes are resolved one depth level at a time, each
//!   composing exactly once with its already resolved parent. Batches must
//!   run in order, which [`GenerationToken`] enforces.
//!
//! Both produce `world = parent_world · local`, so for the same hierarchy they
//! agree up to floating-point rounding.

pub mod generation;
pub mod root_walk;

pub use generation::{
    GenerationToken, PassComplete, ResolveState, resolve_generation, resolve_generation_item,
    seed_identity,
};
pub use root_walk::{resolve_root_walk, resolve_root_walk_item, world_matrix};
