// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! [`GenerationSchedule`](crate::schedule::GenerationSchedule) tracks
//! invalidation per generation (via [`understory_dirty`]), not per node. Each
//! generation depends on the one before it, and [`TRANSFORM`] is marked with
//! [`EagerPolicy`](understory_dirty::EagerPolicy), so marking a generation
//! dirty also marks every deeper one: their world matrices are composed from
//! it.

use understory_dirty::Channel;

/// Local transforms or parent links in a generation changed.
pub const TRANSFORM: Channel = Channel::new(0);
