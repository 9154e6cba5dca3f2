// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Remote access through the `hg` client

use async_trait::async_trait;
use hgm_domain_types::NodeId;
use std::path::{Path, PathBuf};
use std::process::Output;
use tracing::{debug, info};

use crate::hg::describe;
use crate::parse::{
    DISCOVERY_TEMPLATE, heads_of, parse_discovered_changesets, parse_pushkey_bookmarks,
};
use crate::{
    HgCommand, RemoteAccess, RemoteHead, RemoteOptions, ResolvedSource, Session, StagingArea,
    VcsError, VcsResult,
};

const URL_SCHEMES: &[&str] = &["http", "https", "ssh", "file", "static-http"];

/// Remote access that runs `hg` inside a local repository
#[derive(Debug, Clone)]
pub struct HgRemote {
    cwd: PathBuf,
    hg: HgCommand,
    options: RemoteOptions,
}

impl HgRemote {
    /// `cwd` is the local repository whose path aliases apply and which
    /// incoming discovery compares against.
    pub fn new(cwd: impl Into<PathBuf>, hg: HgCommand, options: RemoteOptions) -> Self {
        Self {
            cwd: cwd.into(),
            hg,
            options,
        }
    }

    async fn exchange(&self, operation: &str, args: Vec<String>) -> VcsResult<Output> {
        debug!(command = %describe(&args), "remote exchange");
        let mut cmd = self.hg.tokio_command(&self.cwd);
        cmd.args(&args);
        let output = match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output()).await.map_err(|_| {
                VcsError::Timeout {
                    operation: operation.to_string(),
                    seconds: limit.as_secs(),
                }
            })??,
            None => cmd.output().await?,
        };
        Ok(output)
    }

    fn args(&self, command: &str, with_insecure: bool) -> Vec<String> {
        let mut args = vec![command.to_string(), "--quiet".to_string()];
        args.extend(self.options.config_args());
        if with_insecure && self.options.insecure {
            args.push("--insecure".to_string());
        }
        args
    }

    fn incoming_args(&self, session: &Session, bundle: &Path) -> Vec<String> {
        let mut args = self.args("incoming", true);
        args.extend([
            "--bundle".to_string(),
            bundle.display().to_string(),
            "-T".to_string(),
            DISCOVERY_TEMPLATE.to_string(),
        ]);
        if let Some(branch) = &session.source.branch {
            args.extend(["--branch".to_string(), branch.clone()]);
        }
        args.push(session.url().to_string());
        args
    }

    async fn lookup_alias(&self, name: &str) -> VcsResult<Option<String>> {
        let output = self.exchange("path lookup", vec!["paths".into(), name.into()]).await?;
        if !output.status.success() {
            return Ok(None);
        }
        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!url.is_empty()).then_some(url))
    }
}

fn stderr_of(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr
    }
}

/// Split a `url#branch` fragment off a location.
pub fn split_fragment(location: &str) -> (&str, Option<&str>) {
    match location.split_once('#') {
        Some((base, branch)) if !branch.is_empty() => (base, Some(branch)),
        Some((base, _)) => (base, None),
        None => (location, None),
    }
}

/// Classify a location that is not a path alias: a URL with a supported
/// scheme, or an existing local directory relative to `cwd`.
pub fn classify_location(location: &str, cwd: &Path) -> VcsResult<String> {
    if location.contains("://") {
        let url = url::Url::parse(location)
            .map_err(|e| VcsError::resolution(location, format!("malformed URL: {}", e)))?;
        if !URL_SCHEMES.contains(&url.scheme()) {
            return Err(VcsError::resolution(
                location,
                format!("unsupported scheme {:?}", url.scheme()),
            ));
        }
        return Ok(location.to_string());
    }

    let path = cwd.join(location);
    if path.is_dir() {
        Ok(path.display().to_string())
    } else {
        Err(VcsError::resolution(
            location,
            "not a configured path alias, URL, or local repository",
        ))
    }
}

#[async_trait]
impl RemoteAccess for HgRemote {
    async fn resolve_location(&self, location: &str) -> VcsResult<ResolvedSource> {
        let (base, branch) = split_fragment(location);
        if base.is_empty() {
            return Err(VcsError::resolution(location, "empty location"));
        }

        let (alias, url, branch) = match self.lookup_alias(base).await? {
            Some(expanded) => {
                let (url, alias_branch) = split_fragment(&expanded);
                let branch = branch.or(alias_branch).map(str::to_string);
                (Some(base.to_string()), classify_location(url, &self.cwd)?, branch)
            }
            None => (None, classify_location(base, &self.cwd)?, branch.map(str::to_string)),
        };

        info!(location, url = %url, alias = ?alias, "resolved remote");
        Ok(ResolvedSource {
            location: location.to_string(),
            alias,
            url,
            branch,
        })
    }

    async fn connect(&self, source: &ResolvedSource) -> VcsResult<Session> {
        let mut args = self.args("identify", true);
        args.extend(["--id".to_string(), source.url.clone()]);
        let output = self.exchange("connect", args).await.map_err(|e| match e {
            VcsError::Io(io) => VcsError::connection(&source.url, io.to_string()),
            other => other,
        })?;
        if !output.status.success() {
            return Err(VcsError::connection(&source.url, stderr_of(&output)));
        }
        let remote_id = String::from_utf8_lossy(&output.stdout);
        debug!(url = %source.url, id = remote_id.trim(), "connected");
        Ok(Session { source: source.clone() })
    }

    async fn acquire_staging(&self, session: &Session) -> VcsResult<StagingArea> {
        StagingArea::in_temp_dir(session.url())
    }

    async fn discover_remote_heads(
        &self,
        session: &Session,
        staging: &StagingArea,
    ) -> VcsResult<Vec<RemoteHead>> {
        let bundle = staging
            .bundle_path()
            .ok_or_else(|| VcsError::protocol("incoming", "staging area has no storage"))?;
        let args = self.incoming_args(session, &bundle);
        let output = self.exchange("incoming", args).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        // Exit status 1 with nothing printed means no incoming changesets.
        match output.status.code() {
            Some(0) => {}
            Some(1) if stdout.trim().is_empty() => return Ok(Vec::new()),
            _ => return Err(VcsError::protocol("incoming", stderr_of(&output))),
        }
        let entries = parse_discovered_changesets(&stdout)?;
        Ok(heads_of(&entries))
    }

    async fn release_staging(&self, staging: StagingArea) -> VcsResult<()> {
        debug!(staging = staging.label(), "releasing staging area");
        staging.close()
    }

    async fn list_remote_bookmarks(&self, session: &Session) -> VcsResult<Vec<(String, NodeId)>> {
        let mut args = self.args("debugpushkey", false);
        args.extend([session.url().to_string(), "bookmarks".to_string()]);
        let output = self.exchange("listkeys bookmarks", args).await?;
        if !output.status.success() {
            return Err(VcsError::protocol("listkeys bookmarks", stderr_of(&output)));
        }
        parse_pushkey_bookmarks(&String::from_utf8_lossy(&output.stdout))
    }
}
