// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Revision identifiers

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of a node hash in bytes.
pub const NODE_LEN: usize = 20;

/// Error returned when a string is not a complete hexadecimal node hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid node id {value:?}: expected {} hexadecimal characters", NODE_LEN * 2)]
pub struct InvalidNodeId {
    pub value: String,
}

/// Content-addressed identifier of a revision.
///
/// Only full 40-character hashes are accepted, so an abbreviated or
/// ambiguous prefix can never be stored in a marker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId([u8; NODE_LEN]);

impl NodeId {
    /// The null revision, reported as the working copy parent of an empty repository.
    pub const NULL: NodeId = NodeId([0; NODE_LEN]);

    pub fn from_bytes(bytes: [u8; NODE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NODE_LEN] {
        &self.0
    }

    /// Parse a full-length hexadecimal node hash (case-insensitive).
    pub fn from_hex(value: &str) -> Result<Self, InvalidNodeId> {
        let invalid = || InvalidNodeId {
            value: value.to_string(),
        };
        if value.len() != NODE_LEN * 2 {
            return Err(invalid());
        }
        let mut bytes = [0u8; NODE_LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }

    /// Lowercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0; NODE_LEN]
    }

    /// First twelve hex characters, for log messages.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.short())
    }
}

impl FromStr for NodeId {
    type Err = InvalidNodeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        NodeId::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "0b1d5a0e6c3f7d3a9a3f4c1b2e5d6f708192a3b4";

    #[test]
    fn test_parse_full_hash() {
        let node = NodeId::from_hex(HASH).unwrap();
        assert_eq!(node.to_hex(), HASH);
        assert_eq!(node.to_string(), HASH);
        assert_eq!(node.short(), "0b1d5a0e6c3f");
    }

    #[test]
    fn test_uppercase_is_normalized() {
        let node = NodeId::from_hex(&HASH.to_uppercase()).unwrap();
        assert_eq!(node.to_hex(), HASH);
    }

    #[test]
    fn test_rejects_prefix_and_garbage() {
        assert!(NodeId::from_hex(&HASH[..12]).is_err());
        assert!(NodeId::from_hex(&format!("{}00", HASH)).is_err());
        assert!(NodeId::from_hex(&HASH.replace('a', "z")).is_err());
        assert!(NodeId::from_hex("").is_err());
    }

    #[test]
    fn test_null_node() {
        assert!(NodeId::NULL.is_null());
        assert_eq!(NodeId::NULL.to_hex(), "0".repeat(40));
        assert!(!NodeId::from_hex(HASH).unwrap().is_null());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let node: NodeId = HASH.parse().unwrap();
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, format!("\"{}\"", HASH));

        let err = serde_json::from_str::<NodeId>("\"abc123\"").unwrap_err();
        assert!(err.to_string().contains("invalid node id"));
    }
}
