// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Remote repository access
//!
//! A remote is reached in three steps: the location string is resolved
//! against configured path aliases, a session is established, and then the
//! head-discovery and bookmark-listing exchanges run over that session.
//! Head discovery needs a staging area for the changesets it pulls over;
//! callers pair every [`RemoteAccess::acquire_staging`] with a
//! [`RemoteAccess::release_staging`] on every exit path.

use async_trait::async_trait;
use hgm_domain_types::NodeId;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use crate::VcsResult;

/// A location after alias expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    /// Location as the caller wrote it
    pub location: String,
    /// Alias the location was looked up under, if any
    pub alias: Option<String>,
    /// URL or path handed to `hg`
    pub url: String,
    /// Branch named by a `#branch` fragment; discovery is limited to it
    pub branch: Option<String>,
}

/// An established connection to a remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub source: ResolvedSource,
}

impl Session {
    pub fn url(&self) -> &str {
        &self.source.url
    }
}

/// Branch head reported by the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHead {
    pub branch: String,
    pub node: NodeId,
}

/// Transient storage for changesets discovered on a remote.
///
/// Released through [`RemoteAccess::release_staging`]; dropping it without
/// releasing still removes any backing directory.
#[derive(Debug)]
pub struct StagingArea {
    label: String,
    dir: Option<TempDir>,
}

impl StagingArea {
    /// Staging area without backing storage.
    pub fn detached(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            dir: None,
        }
    }

    /// Staging area backed by a fresh temporary directory.
    pub fn in_temp_dir(label: impl Into<String>) -> VcsResult<Self> {
        let dir = tempfile::Builder::new().prefix("hgm-staging-").tempdir()?;
        Ok(Self {
            label: label.into(),
            dir: Some(dir),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// File the discovery exchange writes its bundle to.
    pub fn bundle_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.path().join("incoming.hg"))
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_ref().map(TempDir::path)
    }

    /// Remove backing storage, reporting failures.
    pub fn close(self) -> VcsResult<()> {
        if let Some(dir) = self.dir {
            dir.close()?;
        }
        Ok(())
    }
}

/// Transport options applied to every remote exchange
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOptions {
    /// Command used to reach `ssh://` remotes
    pub ssh: Option<String>,
    /// `hg` command to run on the remote side
    pub remotecmd: Option<String>,
    /// Skip TLS certificate verification
    pub insecure: bool,
    /// Upper bound for each exchange
    pub timeout: Option<Duration>,
}

impl RemoteOptions {
    /// Options expressed as `--config` overrides, accepted by every command.
    pub fn config_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(ssh) = &self.ssh {
            args.push("--config".to_string());
            args.push(format!("ui.ssh={}", ssh));
        }
        if let Some(remotecmd) = &self.remotecmd {
            args.push("--config".to_string());
            args.push(format!("ui.remotecmd={}", remotecmd));
        }
        args
    }
}

/// Network access to a remote repository
#[async_trait]
pub trait RemoteAccess: Send + Sync {
    async fn resolve_location(&self, location: &str) -> VcsResult<ResolvedSource>;

    async fn connect(&self, source: &ResolvedSource) -> VcsResult<Session>;

    async fn acquire_staging(&self, session: &Session) -> VcsResult<StagingArea>;

    /// Discover the remote's branch heads, using `staging` for transferred data.
    async fn discover_remote_heads(
        &self,
        session: &Session,
        staging: &StagingArea,
    ) -> VcsResult<Vec<RemoteHead>>;

    async fn release_staging(&self, staging: StagingArea) -> VcsResult<()>;

    /// List the `bookmarks` key namespace of the remote.
    async fn list_remote_bookmarks(&self, session: &Session) -> VcsResult<Vec<(String, NodeId)>>;
}
