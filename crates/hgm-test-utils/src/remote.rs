// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Scriptable in-memory remote

use async_trait::async_trait;
use hgm_domain_types::NodeId;
use hgm_repo::{RemoteAccess, RemoteHead, ResolvedSource, Session, StagingArea, VcsError, VcsResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Exchange at which a [`FakeRemote`] is told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    Resolve,
    Connect,
    Acquire,
    Discover,
    Release,
    Bookmarks,
}

/// Remote backed by fixed heads and bookmarks.
///
/// Locations not registered as aliases resolve to themselves. Staging areas
/// are counted so tests can check every acquire is paired with a release.
#[derive(Debug, Default)]
pub struct FakeRemote {
    aliases: HashMap<String, String>,
    heads: Vec<RemoteHead>,
    bookmarks: Vec<(String, NodeId)>,
    failures: Vec<FailurePoint>,
    acquired: AtomicUsize,
    released: AtomicUsize,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: impl Into<String>, url: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), url.into());
        self
    }

    pub fn with_head(mut self, branch: impl Into<String>, node: NodeId) -> Self {
        self.heads.push(RemoteHead {
            branch: branch.into(),
            node,
        });
        self
    }

    pub fn with_bookmark(mut self, name: impl Into<String>, node: NodeId) -> Self {
        self.bookmarks.push((name.into(), node));
        self
    }

    pub fn failing_at(mut self, point: FailurePoint) -> Self {
        self.failures.push(point);
        self
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Names of the exchanges performed so far, in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn fails_at(&self, point: FailurePoint) -> bool {
        self.failures.contains(&point)
    }
}

#[async_trait]
impl RemoteAccess for FakeRemote {
    async fn resolve_location(&self, location: &str) -> VcsResult<ResolvedSource> {
        self.record("resolve");
        if self.fails_at(FailurePoint::Resolve) {
            return Err(VcsError::resolution(location, "unknown location"));
        }
        let alias = self.aliases.get(location);
        Ok(ResolvedSource {
            location: location.to_string(),
            alias: alias.map(|_| location.to_string()),
            url: alias.cloned().unwrap_or_else(|| location.to_string()),
            branch: None,
        })
    }

    async fn connect(&self, source: &ResolvedSource) -> VcsResult<Session> {
        self.record("connect");
        if self.fails_at(FailurePoint::Connect) {
            return Err(VcsError::connection(&source.url, "connection refused"));
        }
        Ok(Session { source: source.clone() })
    }

    async fn acquire_staging(&self, _session: &Session) -> VcsResult<StagingArea> {
        self.record("acquire");
        if self.fails_at(FailurePoint::Acquire) {
            return Err(VcsError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "staging directory not writable",
            )));
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(StagingArea::detached("fake"))
    }

    async fn discover_remote_heads(
        &self,
        _session: &Session,
        _staging: &StagingArea,
    ) -> VcsResult<Vec<RemoteHead>> {
        self.record("discover");
        if self.fails_at(FailurePoint::Discover) {
            return Err(VcsError::protocol("incoming", "unexpected end of stream"));
        }
        Ok(self.heads.clone())
    }

    async fn release_staging(&self, staging: StagingArea) -> VcsResult<()> {
        self.record("release");
        self.released.fetch_add(1, Ordering::SeqCst);
        if self.fails_at(FailurePoint::Release) {
            return Err(VcsError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "staging directory busy",
            )));
        }
        staging.close()
    }

    async fn list_remote_bookmarks(&self, _session: &Session) -> VcsResult<Vec<(String, NodeId)>> {
        self.record("bookmarks");
        if self.fails_at(FailurePoint::Bookmarks) {
            return Err(VcsError::protocol("listkeys", "namespace unavailable"));
        }
        Ok(self.bookmarks.clone())
    }
}
