// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Layered configuration for hg-markers.
//!
//! TOML files and environment variables are converted to `serde_json::Value`
//! layers, validated against the schema derived from [`MarkersConfig`], and
//! merged in precedence order before typed extraction.

pub mod env;
pub mod extract;
pub mod loader;
pub mod merge;
pub mod paths;
pub mod schema;

pub use paths::{Paths, discover_paths};
pub use schema::{HgSection, MarkersConfig, RemoteSection};

use anyhow::{Context, Result};
use serde_json::Value as J;
use std::path::Path;

/// Configuration scope, in precedence order
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Scope {
    System,
    User,
    Repo,
    Env,
    CliConfig,
    Flags,
}

/// Merged configuration
#[derive(Debug)]
pub struct Resolved {
    pub json: J,
    /// Scopes that contributed a layer, lowest precedence first
    pub scopes: Vec<Scope>,
}

impl Resolved {
    pub fn config(&self) -> Result<MarkersConfig> {
        extract::get(&self.json)
    }
}

/// Load and merge all configuration layers.
///
/// Precedence order: system < user < repo < env < cli-config < flags.
/// Missing system, user, and repo files are skipped; a `--config` file must
/// exist. Any unreadable or invalid layer aborts the load.
pub fn load_all(paths: &Paths, flag_sets: &[(&str, J)]) -> Result<Resolved> {
    use Scope::*;

    let system_layer = read_optional_layer(Some(&paths.system), System)?;
    let user_layer = read_optional_layer(Some(&paths.user), User)?;
    let repo_layer = read_optional_layer(paths.repo.as_deref(), Repo)?;

    let env_layer = env::env_overlay().context("reading HGM_* environment")?;
    loader::validate_against_schema(&env_layer).context("validating HGM_* environment")?;

    let cli_config_layer = match &paths.cli_config {
        Some(path) => Some(loader::read_layer_from_file(path, CliConfig)?.json),
        None => None,
    };
    let flags_layer = env::flags_overlay(flag_sets);

    let layers = [
        (system_layer, System),
        (user_layer, User),
        (repo_layer, Repo),
        (Some(env_layer), Env),
        (cli_config_layer, CliConfig),
        (Some(flags_layer), Flags),
    ];

    let mut json = serde_json::json!({});
    let mut scopes = Vec::new();
    for (layer, scope) in layers {
        if let Some(layer) = layer {
            if layer.as_object().is_some_and(|obj| obj.is_empty()) {
                continue;
            }
            merge::merge_two_json(&mut json, layer);
            scopes.push(scope);
        }
    }

    Ok(Resolved { json, scopes })
}

fn read_optional_layer(path: Option<&Path>, scope: Scope) -> Result<Option<J>> {
    match path {
        Some(path) if path.exists() => Ok(Some(loader::read_layer_from_file(path, scope)?.json)),
        _ => Ok(None),
    }
}

/// Load configuration for the repository at `repo_root` and extract it.
pub fn load(
    repo_root: Option<&Path>,
    cli_config: Option<&Path>,
    flag_sets: &[(&str, J)],
) -> Result<MarkersConfig> {
    let mut paths = discover_paths(repo_root);
    paths.cli_config = cli_config.map(Path::to_path_buf);
    load_all(&paths, flag_sets)?.config()
}
