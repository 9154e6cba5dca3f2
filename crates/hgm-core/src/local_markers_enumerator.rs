// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Local Marker Enumerator - Working Copy Marker Discovery
//!
//! This module implements the full marker listing for a repository the
//! caller has open: branch heads with activity, tip, closed, and current
//! flags, then bookmarks, plus virtual markers so the listing always shows
//! the declared branch and the working-copy position.

use async_trait::async_trait;
use hgm_domain_types::{HeadFlags, Marker};
use hgm_repo::LocalRepoView;
use tracing::debug;

/// Compute the marker listing of a local repository.
///
/// Output order: branch heads (branch order, then head order as the view
/// reports them), the virtual branch marker if the declared branch has no
/// head, bookmarks in table order, and the virtual commit marker if no head
/// or bookmark is active.
pub fn collect_local_markers<V: LocalRepoView + ?Sized>(repo: &V) -> crate::Result<Vec<Marker>> {
    let active_node = repo.current_revision();
    let open_heads = repo.open_heads();
    let current_name = repo.current_branch_name();
    let mut saw_current = false;
    let mut saw_active = false;
    let mut markers = Vec::new();

    for branch in repo.branches() {
        for head in &branch.heads {
            let flags = HeadFlags {
                is_active: *head == active_node,
                is_tip: *head == branch.tip,
                is_current: branch.name == current_name,
                // A head can be retired without an explicit close when it is
                // no longer a head of the whole graph.
                is_closed: branch.closed || !open_heads.contains(head),
            };
            saw_active |= flags.is_active;
            saw_current |= flags.is_current;

            let description = repo.description(head)?;
            markers.push(Marker::branch_head(&branch.name, *head, flags, description));
        }
    }

    if !saw_current {
        debug!(branch = current_name, "declared branch has no heads, adding virtual branch marker");
        markers.push(Marker::virtual_branch(current_name));
    }

    let bookmarks = repo.bookmarks();
    for (name, node) in &bookmarks.entries {
        let is_active = bookmarks.active.as_deref() == Some(name.as_str());
        saw_active |= is_active;

        let description = repo.description(node)?;
        markers.push(Marker::bookmark(name, *node, is_active, description));
    }

    if !saw_active {
        debug!(
            node = %active_node.short(),
            "working copy is not on a marker, adding virtual commit marker"
        );
        let description = repo.description(&active_node)?;
        markers.push(Marker::virtual_commit(active_node, description));
    }

    debug!(count = markers.len(), "collected local markers");
    Ok(markers)
}

/// Marker enumerator over a local repository view
///
/// Holds a read-only snapshot; every call recomputes the listing from it.
pub struct LocalMarkersEnumerator<V: LocalRepoView> {
    view: V,
    description: String,
}

impl<V: LocalRepoView> LocalMarkersEnumerator<V> {
    /// Create a new local marker enumerator
    pub fn new(view: V, description: impl Into<String>) -> Self {
        Self {
            view,
            description: description.into(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}

#[async_trait]
impl<V: LocalRepoView + Send + Sync> super::MarkersEnumerator for LocalMarkersEnumerator<V> {
    async fn list_markers(&self) -> crate::Result<Vec<Marker>> {
        collect_local_markers(&self.view)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
