// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Environment and flag overlays

use anyhow::Result;
use serde_json::Value as J;

use crate::MarkersConfig;

/// Create a JSON overlay from `HGM_*` variables.
///
/// Sections are separated by a double underscore and single underscores
/// become dashes: `HGM_REMOTE__TIMEOUT_SECS=30` sets `remote.timeout-secs`.
/// Variables outside the known sections (`HGM_HOME`, `HGM_VERBOSE`, ...)
/// are ignored; unknown keys inside a known section are still rejected.
pub fn env_overlay() -> Result<J> {
    let built = config::Config::builder()
        .add_source(
            config::Environment::with_prefix("HGM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let overlay = built.try_deserialize::<serde_json::Map<String, J>>()?;
    Ok(known_sections(kebab_keys(J::Object(overlay)))?)
}

fn known_sections(overlay: J) -> serde_json::Result<J> {
    let J::Object(known) = serde_json::to_value(MarkersConfig::default())? else {
        return Ok(overlay);
    };
    Ok(match overlay {
        J::Object(map) => J::Object(
            map.into_iter()
                .filter(|(section, _)| known.contains_key(section))
                .collect(),
        ),
        other => other,
    })
}

fn kebab_keys(value: J) -> J {
    match value {
        J::Object(map) => J::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase().replace('_', "-"), kebab_keys(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Create a JSON overlay from dotted-key flag values
pub fn flags_overlay(pairs: &[(&str, J)]) -> J {
    let mut root = serde_json::json!({});
    for (k, v) in pairs {
        crate::merge::insert_dotted(&mut root, k, v.clone());
    }
    root
}
