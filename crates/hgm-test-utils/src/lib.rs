// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! hg-markers test utilities
//!
//! Fixtures shared by the collector and CLI tests: deterministic node ids,
//! canned repository snapshots, and a scriptable remote.

pub mod remote;
pub mod scenarios;

pub use remote::{FailurePoint, FakeRemote};
pub use scenarios::node;
