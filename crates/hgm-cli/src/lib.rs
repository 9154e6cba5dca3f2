// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use clap::Subcommand;
use hgm_logging::CliLoggingArgs;
use std::path::PathBuf;

pub mod ls_markers;

/// Settings a subcommand contributes to the flags configuration layer
pub trait SubcommandOverrides {
    /// Dotted keys and values, only for flags the user actually passed.
    fn config_overrides(&self) -> Vec<(&'static str, serde_json::Value)>;
}

#[derive(clap::Parser)]
#[command(
    name = "hgm",
    about = "List the branch heads, bookmarks, and working-copy position of a Mercurial repository",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Extra configuration file, applied above user and repository files
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print markers as JSON
    LsMarkers(ls_markers::LsMarkersArgs),
}

pub use clap::Parser;
