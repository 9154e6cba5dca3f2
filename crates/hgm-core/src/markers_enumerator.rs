// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Marker Enumeration - Abstract Marker Discovery Interface
//!
//! This module defines the `MarkersEnumerator` trait that abstracts marker
//! discovery across the local and remote modes.

use async_trait::async_trait;
use hgm_domain_types::Marker;

/// Abstract trait for marker discovery
///
/// - Local: read an open repository and compute every flag
/// - Remote: query a remote over the wire and report identity only
#[async_trait]
pub trait MarkersEnumerator: Send + Sync {
    /// Produce the full marker listing, or fail without a partial result.
    async fn list_markers(&self) -> crate::Result<Vec<Marker>>;

    /// Get a human-readable description of this enumerator
    fn description(&self) -> &str;
}
