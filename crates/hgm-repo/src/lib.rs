// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Read-only Mercurial repository access for hg-markers.
//!
//! This crate exposes the repository state the marker collectors need as
//! explicit view objects: [`LocalRepoView`] for a repository on disk and
//! [`RemoteAccess`] for a repository reached over the wire. The concrete
//! implementations drive the `hg` command-line client and never write to
//! the repository.

pub mod error;
pub mod hg;
pub mod hg_remote;
pub mod local;
pub mod parse;
pub mod remote;
pub mod view;

pub use error::{VcsError, VcsResult};
pub use hg::HgCommand;
pub use hg_remote::HgRemote;
pub use local::{HgRepo, find_root};
pub use remote::{RemoteAccess, RemoteHead, RemoteOptions, ResolvedSource, Session, StagingArea};
pub use view::{BookmarkTable, BranchHeads, LocalRepoView, LocalSnapshot, LocalSnapshotBuilder};
