// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Marker records
//!
//! A marker is a named or virtual position in a repository: a branch head,
//! a bookmark, or the bare working-copy revision.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::NodeId;

/// Kind of position a marker refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Branch,
    Bookmark,
    /// Virtual marker for a working copy that sits on neither a head nor a bookmark
    Commit,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Branch => write!(f, "branch"),
            MarkerKind::Bookmark => write!(f, "bookmark"),
            MarkerKind::Commit => write!(f, "commit"),
        }
    }
}

/// One entry of a marker listing.
///
/// Fields are declared in sorted key order so the serialized object has
/// stable sorted keys. Every optional field serializes as `null` when
/// absent; remote markers leave all flags and the description unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub description: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
    #[serde(rename = "isClosed")]
    pub is_closed: Option<bool>,
    #[serde(rename = "isCurrent")]
    pub is_current: Option<bool>,
    #[serde(rename = "isTip")]
    pub is_tip: Option<bool>,
    pub name: Option<String>,
    pub node: Option<NodeId>,
    #[serde(rename = "type")]
    pub kind: MarkerKind,
}

/// Flags computed for a local branch head
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadFlags {
    pub is_active: bool,
    pub is_closed: bool,
    pub is_tip: bool,
    pub is_current: bool,
}

impl Marker {
    /// Branch head of a local repository.
    pub fn branch_head(
        name: impl Into<String>,
        node: NodeId,
        flags: HeadFlags,
        description: impl Into<String>,
    ) -> Self {
        Self {
            description: Some(description.into()),
            is_active: Some(flags.is_active),
            is_closed: Some(flags.is_closed),
            is_current: Some(flags.is_current),
            is_tip: Some(flags.is_tip),
            name: Some(name.into()),
            node: Some(node),
            kind: MarkerKind::Branch,
        }
    }

    /// Branch declared in the working copy that has no commits yet.
    pub fn virtual_branch(name: impl Into<String>) -> Self {
        Self {
            description: None,
            is_active: Some(false),
            is_closed: Some(false),
            is_current: Some(true),
            is_tip: Some(false),
            name: Some(name.into()),
            node: None,
            kind: MarkerKind::Branch,
        }
    }

    /// Bookmark of a local repository.
    pub fn bookmark(
        name: impl Into<String>,
        node: NodeId,
        is_active: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            description: Some(description.into()),
            is_active: Some(is_active),
            is_closed: None,
            is_current: None,
            is_tip: None,
            name: Some(name.into()),
            node: Some(node),
            kind: MarkerKind::Bookmark,
        }
    }

    /// Bare working-copy position.
    pub fn virtual_commit(node: NodeId, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            is_active: Some(false),
            is_closed: Some(false),
            is_current: Some(true),
            is_tip: Some(false),
            name: None,
            node: Some(node),
            kind: MarkerKind::Commit,
        }
    }

    pub fn remote_branch(name: impl Into<String>, node: NodeId) -> Self {
        Self::remote(MarkerKind::Branch, name.into(), node)
    }

    pub fn remote_bookmark(name: impl Into<String>, node: NodeId) -> Self {
        Self::remote(MarkerKind::Bookmark, name.into(), node)
    }

    fn remote(kind: MarkerKind, name: String, node: NodeId) -> Self {
        Self {
            description: None,
            is_active: None,
            is_closed: None,
            is_current: None,
            is_tip: None,
            name: Some(name),
            node: Some(node),
            kind,
        }
    }

    /// True for the synthesized branch and commit markers.
    pub fn is_virtual(&self) -> bool {
        match self.kind {
            MarkerKind::Branch => self.node.is_none(),
            MarkerKind::Commit => true,
            MarkerKind::Bookmark => false,
        }
    }

    pub fn active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn node() -> NodeId {
        NodeId::from_bytes([0xab; 20])
    }

    #[test]
    fn test_keys_serialize_sorted_with_explicit_nulls() {
        let marker = Marker::virtual_branch("feature");
        let json = serde_json::to_string(&marker).unwrap();
        assert_eq!(
            json,
            r#"{"description":null,"isActive":false,"isClosed":false,"isCurrent":true,"isTip":false,"name":"feature","node":null,"type":"branch"}"#
        );
    }

    #[test]
    fn test_remote_marker_has_only_identity() {
        let value = serde_json::to_value(Marker::remote_bookmark("stable", node())).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 8);
        assert_eq!(obj["type"], "bookmark");
        assert_eq!(obj["name"], "stable");
        assert_eq!(obj["node"], Value::String("ab".repeat(20)));
        for key in ["isActive", "isClosed", "isTip", "isCurrent", "description"] {
            assert!(obj[key].is_null(), "{} should be null", key);
        }
    }

    #[test]
    fn test_local_bookmark_leaves_branch_flags_unset() {
        let marker = Marker::bookmark("wip", node(), true, "work in progress");
        assert_eq!(marker.is_active, Some(true));
        assert_eq!(marker.is_closed, None);
        assert_eq!(marker.is_tip, None);
        assert_eq!(marker.is_current, None);
        assert!(!marker.is_virtual());
    }

    #[test]
    fn test_virtual_markers() {
        assert!(Marker::virtual_branch("x").is_virtual());
        assert!(Marker::virtual_commit(node(), "msg").is_virtual());
        let head = Marker::branch_head("default", node(), HeadFlags::default(), "msg");
        assert!(!head.is_virtual());
        assert!(!head.active());
    }

    #[test]
    fn test_decodes_listing_with_missing_keys() {
        // Older producers omitted keys instead of writing null.
        let json = format!(r#"{{"type":"branch","name":"default","node":"{}"}}"#, "ab".repeat(20));
        let marker: Marker = serde_json::from_str(&json).unwrap();
        assert_eq!(marker, Marker::remote_branch("default", node()));
    }
}
