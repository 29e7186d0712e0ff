// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The convergence pass: target resolution, copy diffing, and the driver.

pub mod diff;
pub mod driver;
pub mod targets;

pub use diff::{materialize_copy, plan_copy, CopyAction};
pub use driver::{converge, Outcome, SkipReason};
pub use targets::{resolve_targets, TargetSpec};
