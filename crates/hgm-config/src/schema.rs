// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration shape.
//!
//! The same types validate each layer (through the derived JSON schema) and
//! give typed access to the merged result.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root of an hg-markers configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MarkersConfig {
    #[serde(default)]
    pub hg: HgSection,
    #[serde(default)]
    pub remote: RemoteSection,
}

/// How the `hg` executable is invoked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HgSection {
    /// Executable name or path (default: `hg` from PATH)
    pub binary: Option<String>,
    /// Run with `HGPLAIN=1` so user settings cannot change output (default: true)
    pub plain: Option<bool>,
}

impl HgSection {
    pub fn binary(&self) -> &str {
        self.binary.as_deref().unwrap_or("hg")
    }

    pub fn plain(&self) -> bool {
        self.plain.unwrap_or(true)
    }
}

/// Defaults for reaching remote repositories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RemoteSection {
    /// Upper bound in seconds for each remote exchange
    pub timeout_secs: Option<u64>,
    /// Command used for `ssh://` remotes
    pub ssh: Option<String>,
    /// `hg` command to run on the remote side
    pub remotecmd: Option<String>,
    /// Skip TLS certificate verification
    pub insecure: Option<bool>,
}

impl RemoteSection {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or(false)
    }
}
