// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Canned repository states

use hgm_domain_types::NodeId;
use hgm_repo::{BranchHeads, LocalSnapshot, LocalSnapshotBuilder};

/// Deterministic node id whose every byte is `n`.
pub fn node(n: u8) -> NodeId {
    NodeId::from_bytes([n; 20])
}

/// Description recorded for `node(n)` by the scenarios below.
pub fn message(n: u8) -> String {
    format!("commit {}", n)
}

/// Builder preloaded with descriptions for `node(1)..=node(max)`.
pub fn described(max: u8) -> LocalSnapshotBuilder {
    (1..=max).fold(LocalSnapshot::builder(), |builder, n| {
        builder.description(node(n), message(n))
    })
}

/// One open branch `default` with a single head `node(1)`; the working copy
/// sits on it.
pub fn single_head() -> LocalSnapshot {
    described(1)
        .working_copy(node(1), "default")
        .branch(BranchHeads {
            name: "default".to_string(),
            heads: vec![node(1)],
            tip: node(1),
            closed: false,
        })
        .open_head(node(1))
        .build()
}

/// [`single_head`] with the working copy declaring branch `feature`, which
/// has no commits yet.
pub fn declared_branch() -> LocalSnapshot {
    described(1)
        .working_copy(node(1), "feature")
        .branch(BranchHeads {
            name: "default".to_string(),
            heads: vec![node(1)],
            tip: node(1),
            closed: false,
        })
        .open_head(node(1))
        .build()
}

/// Branch `default` with head `node(2)`; the working copy is checked out at
/// its ancestor `node(1)`.
pub fn historical_checkout() -> LocalSnapshot {
    described(2)
        .working_copy(node(1), "default")
        .branch(BranchHeads {
            name: "default".to_string(),
            heads: vec![node(2)],
            tip: node(2),
            closed: false,
        })
        .open_head(node(2))
        .build()
}

/// A busier repository:
///
/// - `default`: heads `node(2)` and `node(3)` (tip), both graph heads
/// - `stable`: head `node(4)` that was merged into `default` without being
///   closed, so it is no longer a graph head
/// - `old`: explicitly closed branch with head `node(5)`
/// - bookmarks `release` → `node(4)` and `wip` → `node(6)` (active), where
///   `node(6)` is an ancestor of the `default` heads
/// - working copy on `node(6)`, branch `default`
pub fn busy() -> LocalSnapshot {
    described(6)
        .working_copy(node(6), "default")
        .branch(BranchHeads {
            name: "default".to_string(),
            heads: vec![node(2), node(3)],
            tip: node(3),
            closed: false,
        })
        .branch(BranchHeads {
            name: "stable".to_string(),
            heads: vec![node(4)],
            tip: node(4),
            closed: false,
        })
        .branch(BranchHeads {
            name: "old".to_string(),
            heads: vec![node(5)],
            tip: node(5),
            closed: true,
        })
        .open_heads([node(2), node(3), node(5)])
        .bookmark("release", node(4))
        .bookmark("wip", node(6))
        .active_bookmark(Some("wip".to_string()))
        .build()
}

/// Freshly initialized repository: no commits, working copy on the null
/// revision, branch `default`.
pub fn empty() -> LocalSnapshot {
    LocalSnapshot::builder()
        .working_copy(NodeId::NULL, "default")
        .description(NodeId::NULL, "")
        .build()
}
