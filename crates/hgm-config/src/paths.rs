// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration file path discovery

use std::path::{Path, PathBuf};

/// Configuration files consulted, lowest precedence first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub system: PathBuf,
    pub user: PathBuf,
    /// `<root>/.hg/hg-markers.toml` of the repository being listed
    pub repo: Option<PathBuf>,
    /// File named with `--config`; must exist
    pub cli_config: Option<PathBuf>,
}

/// Discover configuration file paths for the current environment
pub fn discover_paths(repo_root: Option<&Path>) -> Paths {
    Paths {
        system: system_config_path(),
        user: user_config_path(),
        repo: repo_root.map(|root| root.join(".hg").join("hg-markers.toml")),
        cli_config: None,
    }
}

fn system_config_path() -> PathBuf {
    if cfg!(target_os = "macos") {
        PathBuf::from("/Library/Application Support/hg-markers/config.toml")
    } else if cfg!(target_os = "windows") {
        PathBuf::from(std::env::var("ProgramData").unwrap_or_else(|_| "C:\\ProgramData".into()))
            .join("hg-markers")
            .join("config.toml")
    } else {
        PathBuf::from("/etc/hg-markers/config.toml")
    }
}

/// `$HGM_HOME/config.toml`, else `hg-markers/config.toml` in the platform
/// config directory.
fn user_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HGM_HOME") {
        return PathBuf::from(home).join("config.toml");
    }

    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(std::env::temp_dir)
        .join("hg-markers")
        .join("config.toml")
}
