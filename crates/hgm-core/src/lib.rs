// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Marker enumeration for Mercurial repositories.
//!
//! This crate turns the raw state exposed by `hgm-repo` into the marker
//! listing: every branch head, every bookmark, and virtual markers for a
//! declared branch without commits and for a working copy that sits on
//! neither. Local repositories get the full set of flags; remote ones only
//! report identity (kind, name, node).

pub mod error;
pub mod local_markers_enumerator;
pub mod markers_enumerator;
pub mod output;
pub mod remote_markers_enumerator;

/// Result type used by the collectors and the output layer.
pub type Result<T> = std::result::Result<T, Error>;

pub use error::{Error, ErrorKind};

/// Marker collection against an open local repository.
pub use local_markers_enumerator::{LocalMarkersEnumerator, collect_local_markers};

/// Abstract marker source shared by the local and remote enumerators.
pub use markers_enumerator::MarkersEnumerator;

/// Rendering and writing of marker listings.
pub use output::{MarkerOutput, render_markers};

/// Marker collection against a remote reached over the wire.
pub use remote_markers_enumerator::{RemoteMarkersEnumerator, collect_remote_markers};

/// Re-export domain types
pub use hgm_domain_types::{Marker, MarkerKind, NodeId};
