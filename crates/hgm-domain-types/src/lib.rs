// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Domain types for hg-markers
//!
//! This crate contains the marker model shared by the local and remote
//! collectors and by the presentation layer. The types are plain values:
//! they carry no repository handles and can be serialized as-is.

pub mod marker;
pub mod node;

pub use marker::{HeadFlags, Marker, MarkerKind};
pub use node::{InvalidNodeId, NodeId};
