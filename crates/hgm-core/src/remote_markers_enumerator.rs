// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Remote Marker Enumerator - Wire Protocol Marker Discovery
//!
//! This module implements the reduced marker listing for a repository that
//! is only reachable through [`RemoteAccess`]. Remote markers carry kind,
//! name, and node; the flags and descriptions need a working copy and are
//! left unset.

use async_trait::async_trait;
use hgm_domain_types::Marker;
use hgm_repo::RemoteAccess;
use tracing::{debug, warn};

/// Compute the marker listing of the remote at `location`.
///
/// Branch markers from head discovery come first, then bookmarks. The
/// staging area used by head discovery is released before this returns,
/// whether discovery succeeded or not. Any failure aborts the listing.
pub async fn collect_remote_markers<A: RemoteAccess + ?Sized>(
    access: &A,
    location: &str,
) -> crate::Result<Vec<Marker>> {
    let source = access.resolve_location(location).await?;
    let session = access.connect(&source).await?;

    let staging = access.acquire_staging(&session).await?;
    let discovered = access.discover_remote_heads(&session, &staging).await;
    let released = access.release_staging(staging).await;
    let heads = match (discovered, released) {
        (Ok(heads), Ok(())) => heads,
        (Ok(_), Err(release_err)) => return Err(release_err.into()),
        (Err(discover_err), Ok(())) => return Err(discover_err.into()),
        (Err(discover_err), Err(release_err)) => {
            warn!(error = %release_err, "failed to release staging area after discovery failure");
            return Err(discover_err.into());
        }
    };

    let mut markers: Vec<Marker> = heads
        .into_iter()
        .map(|head| Marker::remote_branch(head.branch, head.node))
        .collect();
    debug!(count = markers.len(), url = session.url(), "discovered remote branch heads");

    let bookmarks = access.list_remote_bookmarks(&session).await?;
    debug!(count = bookmarks.len(), url = session.url(), "listed remote bookmarks");
    markers.extend(bookmarks.into_iter().map(|(name, node)| Marker::remote_bookmark(name, node)));

    Ok(markers)
}

/// Marker enumerator over a remote location
pub struct RemoteMarkersEnumerator<A: RemoteAccess> {
    access: A,
    location: String,
}

impl<A: RemoteAccess> RemoteMarkersEnumerator<A> {
    /// Create a new remote marker enumerator
    pub fn new(access: A, location: impl Into<String>) -> Self {
        Self {
            access,
            location: location.into(),
        }
    }

    pub fn access(&self) -> &A {
        &self.access
    }
}

#[async_trait]
impl<A: RemoteAccess> super::MarkersEnumerator for RemoteMarkersEnumerator<A> {
    async fn list_markers(&self) -> crate::Result<Vec<Marker>> {
        collect_remote_markers(&self.access, &self.location).await
    }

    fn description(&self) -> &str {
        &self.location
    }
}
