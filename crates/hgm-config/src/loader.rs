// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TOML loading and JSON validation functionality

use anyhow::{Context, Result, anyhow};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value as J;
use std::path::Path;
use std::sync::OnceLock;

use crate::Scope;

/// Parse TOML text into the JSON form used for validation and merging
pub fn parse_toml_to_json(toml_str: &str) -> Result<J> {
    let toml: toml::Value = toml_str.parse::<toml::Value>()?;
    Ok(serde_json::to_value(toml)?)
}

fn validator() -> Result<&'static JSONSchema> {
    static SCHEMA: OnceLock<Result<J, String>> = OnceLock::new();
    static VALIDATOR: OnceLock<Result<JSONSchema, String>> = OnceLock::new();

    let schema = SCHEMA
        .get_or_init(|| {
            serde_json::to_value(schemars::schema_for!(crate::MarkersConfig))
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| anyhow!("generating config schema: {}", e))?;

    VALIDATOR
        .get_or_init(|| {
            JSONSchema::options()
                .with_draft(Draft::Draft202012)
                .compile(schema)
                .map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| anyhow!("compiling config schema: {}", e))
}

/// Validate one layer against the configuration schema
pub fn validate_against_schema(v: &J) -> Result<()> {
    let validator = validator()?;
    if let Err(errors) = validator.validate(v) {
        let error_msg = errors.map(|e| e.to_string()).collect::<Vec<_>>().join("\n  - ");
        anyhow::bail!("Config schema validation failed:\n  - {}", error_msg);
    }
    Ok(())
}

/// A validated configuration layer
#[derive(Debug, Clone)]
pub struct Layer {
    pub scope: Scope,
    pub json: J,
}

/// Load and validate a configuration layer from file
pub fn read_layer_from_file(path: &Path, scope: Scope) -> Result<Layer> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config file {:?}", path))?;

    let json =
        parse_toml_to_json(&content).with_context(|| format!("parsing config file {:?}", path))?;
    validate_against_schema(&json).with_context(|| format!("validating config file {:?}", path))?;

    Ok(Layer { scope, json })
}
