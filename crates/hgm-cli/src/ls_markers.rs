// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! `ls-markers` command

use anyhow::Context;
use clap::Args;
use hgm_config::{MarkersConfig, RemoteSection};
use hgm_core::{
    LocalMarkersEnumerator, Marker, MarkerOutput, MarkersEnumerator, RemoteMarkersEnumerator,
};
use hgm_repo::{HgCommand, HgRemote, HgRepo, RemoteOptions, find_root};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::SubcommandOverrides;

/// Arguments for the ls-markers command
#[derive(Args, Debug, Clone, Default)]
#[command(about = "List branch heads, bookmarks, and the working-copy position as JSON")]
pub struct LsMarkersArgs {
    /// Remote repository to query (path, URL, or path alias); lists the local
    /// repository when omitted
    pub source: Option<String>,

    #[arg(short, long, help = "Write the listing to FILE, which must not exist yet")]
    pub output: Option<PathBuf>,

    #[arg(short = 'e', long, help = "Command used to reach ssh:// remotes")]
    pub ssh: Option<String>,

    #[arg(long, help = "hg command to run on the remote side")]
    pub remotecmd: Option<String>,

    #[arg(long, help = "Do not verify server certificates")]
    pub insecure: bool,

    #[arg(short = 'R', long, help = "Repository to read (default: current directory)")]
    pub repository: Option<PathBuf>,
}

impl SubcommandOverrides for LsMarkersArgs {
    fn config_overrides(&self) -> Vec<(&'static str, Value)> {
        let mut overrides = Vec::new();
        if let Some(ssh) = &self.ssh {
            overrides.push(("remote.ssh", Value::from(ssh.as_str())));
        }
        if let Some(remotecmd) = &self.remotecmd {
            overrides.push(("remote.remotecmd", Value::from(remotecmd.as_str())));
        }
        if self.insecure {
            overrides.push(("remote.insecure", Value::from(true)));
        }
        overrides
    }
}

impl LsMarkersArgs {
    /// Run the ls-markers command
    pub async fn run(self, config_file: Option<&Path>) -> anyhow::Result<()> {
        let output = MarkerOutput::from_path(self.output.clone());
        output.ensure_writable()?;

        let cwd = match &self.repository {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("reading current directory")?,
        };
        let root = find_root(&cwd).ok();
        let config = hgm_config::load(root.as_deref(), config_file, &self.config_overrides())?;
        let hg = hg_command(&config);

        let markers = match &self.source {
            None => {
                let repo = HgRepo::open(&cwd, hg)?;
                let snapshot = repo.snapshot()?;
                let enumerator =
                    LocalMarkersEnumerator::new(snapshot, repo.root().display().to_string());
                list(&enumerator).await?
            }
            Some(source) => {
                let remote = HgRemote::new(root.unwrap_or(cwd), hg, remote_options(&config.remote));
                let enumerator = RemoteMarkersEnumerator::new(remote, source.as_str());
                list(&enumerator).await?
            }
        };

        output.write(&markers)?;
        Ok(())
    }
}

fn hg_command(config: &MarkersConfig) -> HgCommand {
    HgCommand::new(config.hg.binary()).with_plain(config.hg.plain())
}

fn remote_options(remote: &RemoteSection) -> RemoteOptions {
    RemoteOptions {
        ssh: remote.ssh.clone(),
        remotecmd: remote.remotecmd.clone(),
        insecure: remote.insecure(),
        timeout: remote.timeout(),
    }
}

async fn list(enumerator: &dyn MarkersEnumerator) -> hgm_core::Result<Vec<Marker>> {
    info!(source = enumerator.description(), "listing markers");
    let markers = enumerator.list_markers().await?;
    debug!(count = markers.len(), "listing complete");
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_overrides_only_for_given_flags() {
        assert!(LsMarkersArgs::default().config_overrides().is_empty());

        let args = LsMarkersArgs {
            ssh: Some("ssh -C".to_string()),
            insecure: true,
            ..Default::default()
        };
        assert_eq!(
            args.config_overrides(),
            vec![("remote.ssh", Value::from("ssh -C")), ("remote.insecure", Value::from(true))]
        );
    }

    #[test]
    fn test_remote_options_from_config() {
        let remote = RemoteSection {
            timeout_secs: Some(20),
            remotecmd: Some("/opt/hg/bin/hg".to_string()),
            ..Default::default()
        };
        let options = remote_options(&remote);
        assert_eq!(options.timeout, Some(Duration::from_secs(20)));
        assert_eq!(options.remotecmd.as_deref(), Some("/opt/hg/bin/hg"));
        assert_eq!(options.ssh, None);
        assert!(!options.insecure);
    }

    #[test]
    fn test_hg_command_from_config() {
        let mut config = MarkersConfig::default();
        config.hg.binary = Some("/usr/local/bin/hg".to_string());
        config.hg.plain = Some(false);
        let hg = hg_command(&config);
        assert_eq!(hg.binary(), Path::new("/usr/local/bin/hg"));
    }
}
