// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Read-only views of local repository state
//!
//! Collectors receive these views explicitly instead of reaching into a
//! repository handle. Iteration order is part of the contract: branches,
//! heads, and bookmarks are reported in the order the view stores them.

use hgm_domain_types::NodeId;
use std::collections::{HashMap, HashSet};

use crate::{VcsError, VcsResult};

/// Heads of one named branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchHeads {
    pub name: String,
    /// Heads in repository order (oldest first)
    pub heads: Vec<NodeId>,
    /// Most recently created head
    pub tip: NodeId,
    /// Set when the repository marks the whole branch closed
    pub closed: bool,
}

impl BranchHeads {
    /// Build the entry from heads listed oldest first, each paired with
    /// whether it closes the branch.
    ///
    /// The tip is the newest open head, or the newest head when every head
    /// is closed; the branch counts as closed only in the latter case.
    /// Returns `None` for an empty head list.
    pub fn from_revision_order(name: impl Into<String>, heads: &[(NodeId, bool)]) -> Option<Self> {
        let (newest, _) = heads.last()?;
        let open_tip = heads.iter().rev().find(|(_, closes)| !closes).map(|(node, _)| *node);
        Some(Self {
            name: name.into(),
            heads: heads.iter().map(|(node, _)| *node).collect(),
            tip: open_tip.unwrap_or(*newest),
            closed: open_tip.is_none(),
        })
    }
}

/// Bookmark table in storage order plus the active bookmark
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkTable {
    pub entries: Vec<(String, NodeId)>,
    pub active: Option<String>,
}

impl BookmarkTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Repository state consumed by the local marker collector
pub trait LocalRepoView {
    /// Revision the working copy is based on.
    fn current_revision(&self) -> NodeId;

    /// Branch name declared in the working copy; may have no commits yet.
    fn current_branch_name(&self) -> &str;

    fn branches(&self) -> &[BranchHeads];

    /// Every head of the revision graph, across all branches.
    fn open_heads(&self) -> &HashSet<NodeId>;

    fn bookmarks(&self) -> &BookmarkTable;

    /// Summary text of a revision. A node the view cannot describe is an
    /// inconsistency in the repository layer.
    fn description(&self, node: &NodeId) -> VcsResult<String>;
}

/// In-memory repository state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSnapshot {
    current_revision: NodeId,
    current_branch: String,
    branches: Vec<BranchHeads>,
    open_heads: HashSet<NodeId>,
    bookmarks: BookmarkTable,
    descriptions: HashMap<NodeId, String>,
}

impl LocalSnapshot {
    pub fn builder() -> LocalSnapshotBuilder {
        LocalSnapshotBuilder::default()
    }
}

impl LocalRepoView for LocalSnapshot {
    fn current_revision(&self) -> NodeId {
        self.current_revision
    }

    fn current_branch_name(&self) -> &str {
        &self.current_branch
    }

    fn branches(&self) -> &[BranchHeads] {
        &self.branches
    }

    fn open_heads(&self) -> &HashSet<NodeId> {
        &self.open_heads
    }

    fn bookmarks(&self) -> &BookmarkTable {
        &self.bookmarks
    }

    fn description(&self, node: &NodeId) -> VcsResult<String> {
        self.descriptions.get(node).cloned().ok_or_else(|| {
            VcsError::InconsistentState(format!("no changeset recorded for node {}", node))
        })
    }
}

/// Builder for [`LocalSnapshot`]
#[derive(Debug, Clone)]
pub struct LocalSnapshotBuilder {
    current_revision: NodeId,
    current_branch: String,
    branches: Vec<BranchHeads>,
    open_heads: HashSet<NodeId>,
    bookmarks: BookmarkTable,
    descriptions: HashMap<NodeId, String>,
}

impl Default for LocalSnapshotBuilder {
    fn default() -> Self {
        Self {
            current_revision: NodeId::NULL,
            current_branch: "default".to_string(),
            branches: Vec::new(),
            open_heads: HashSet::new(),
            bookmarks: BookmarkTable::default(),
            descriptions: HashMap::new(),
        }
    }
}

impl LocalSnapshotBuilder {
    pub fn working_copy(mut self, node: NodeId, branch: impl Into<String>) -> Self {
        self.current_revision = node;
        self.current_branch = branch.into();
        self
    }

    pub fn branch(mut self, branch: BranchHeads) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn open_head(mut self, node: NodeId) -> Self {
        self.open_heads.insert(node);
        self
    }

    pub fn open_heads(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.open_heads.extend(nodes);
        self
    }

    pub fn bookmark(mut self, name: impl Into<String>, node: NodeId) -> Self {
        self.bookmarks.entries.push((name.into(), node));
        self
    }

    pub fn active_bookmark(mut self, name: Option<String>) -> Self {
        self.bookmarks.active = name;
        self
    }

    pub fn description(mut self, node: NodeId, text: impl Into<String>) -> Self {
        self.descriptions.insert(node, text.into());
        self
    }

    pub fn build(self) -> LocalSnapshot {
        LocalSnapshot {
            current_revision: self.current_revision,
            current_branch: self.current_branch,
            branches: self.branches,
            open_heads: self.open_heads,
            bookmarks: self.bookmarks,
            descriptions: self.descriptions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(b: u8) -> NodeId {
        NodeId::from_bytes([b; 20])
    }

    #[test]
    fn test_tip_is_newest_open_head() {
        let branch = BranchHeads::from_revision_order(
            "default",
            &[(n(1), false), (n(2), false), (n(3), true)],
        )
        .unwrap();
        assert_eq!(branch.heads, vec![n(1), n(2), n(3)]);
        assert_eq!(branch.tip, n(2));
        assert!(!branch.closed);
    }

    #[test]
    fn test_all_heads_closed_closes_branch() {
        let branch =
            BranchHeads::from_revision_order("old", &[(n(1), true), (n(2), true)]).unwrap();
        assert_eq!(branch.tip, n(2));
        assert!(branch.closed);
    }

    #[test]
    fn test_no_heads_yields_none() {
        assert!(BranchHeads::from_revision_order("empty", &[]).is_none());
    }

    #[test]
    fn test_missing_description_is_inconsistent() {
        let snapshot = LocalSnapshot::builder().description(n(1), "first").build();
        assert_eq!(snapshot.description(&n(1)).unwrap(), "first");
        assert!(matches!(
            snapshot.description(&n(2)),
            Err(VcsError::InconsistentState(_))
        ));
    }

    #[test]
    fn test_builder_defaults() {
        let snapshot = LocalSnapshot::builder().build();
        assert_eq!(snapshot.current_revision(), NodeId::NULL);
        assert_eq!(snapshot.current_branch_name(), "default");
        assert!(snapshot.branches().is_empty());
        assert!(snapshot.bookmarks().is_empty());
    }
}
