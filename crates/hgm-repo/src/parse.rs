// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Parsers for `hg` template and wire-listing output

use hgm_domain_types::NodeId;
use serde::Deserialize;
use std::collections::HashSet;

use crate::{RemoteHead, VcsError, VcsResult};

/// One changeset as printed by `hg log -T json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogEntry {
    pub rev: i64,
    pub node: NodeId,
    pub branch: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub parents: Vec<NodeId>,
}

/// One bookmark as printed by `hg bookmarks -T json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookmarkEntry {
    pub bookmark: String,
    pub node: NodeId,
    #[serde(default)]
    pub active: bool,
}

/// Parse a JSON array emitted by `-T json`. Blank output is an empty list.
pub fn parse_json_list<T: for<'de> Deserialize<'de>>(stdout: &str) -> VcsResult<Vec<T>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(stdout)?)
}

/// Parse one full node hash per line.
pub fn parse_node_lines(stdout: &str) -> VcsResult<Vec<NodeId>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| NodeId::from_hex(line).map_err(VcsError::from))
        .collect()
}

/// Template for [`parse_discovered_changesets`]; works with `--quiet`, which
/// strips fields from the built-in `json` style.
pub const DISCOVERY_TEMPLATE: &str = "{node}\\t{p1node}\\t{p2node}\\t{branch}\\n";

/// Parse changesets printed with [`DISCOVERY_TEMPLATE`]. Positions in the
/// output are kept as `rev`.
pub fn parse_discovered_changesets(stdout: &str) -> VcsResult<Vec<LogEntry>> {
    let mut entries = Vec::new();
    for (position, line) in stdout.lines().filter(|line| !line.trim().is_empty()).enumerate() {
        let mut fields = line.splitn(4, '\t');
        let mut next_node = || -> VcsResult<NodeId> {
            let field = fields.next().ok_or_else(|| {
                VcsError::protocol("incoming", format!("truncated changeset line {:?}", line))
            })?;
            NodeId::from_hex(field).map_err(|e| {
                VcsError::protocol("incoming", format!("changeset line {:?}: {}", line, e))
            })
        };
        let node = next_node()?;
        let p1 = next_node()?;
        let p2 = next_node()?;
        let branch = fields.next().ok_or_else(|| {
            VcsError::protocol("incoming", format!("changeset line {:?} has no branch", line))
        })?;
        entries.push(LogEntry {
            rev: position as i64,
            node,
            branch: branch.to_string(),
            desc: String::new(),
            parents: [p1, p2].into_iter().filter(|p| !p.is_null()).collect(),
        });
    }
    Ok(entries)
}

/// Decode a `bookmarks` namespace listing (`name<TAB>hexnode` per line).
pub fn parse_pushkey_bookmarks(stdout: &str) -> VcsResult<Vec<(String, NodeId)>> {
    let mut entries = Vec::new();
    for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
        let (name, value) = line.split_once('\t').ok_or_else(|| {
            VcsError::protocol("listkeys bookmarks", format!("malformed entry {:?}", line))
        })?;
        let node = NodeId::from_hex(value.trim()).map_err(|e| {
            VcsError::protocol("listkeys bookmarks", format!("bookmark {:?}: {}", name, e))
        })?;
        entries.push((name.to_string(), node));
    }
    Ok(entries)
}

/// Branch heads of a discovered changeset set, in the order given.
///
/// An entry is a head of its branch unless another entry on the same branch
/// names it as a parent. A child on a different branch does not end it.
pub fn heads_of(entries: &[LogEntry]) -> Vec<RemoteHead> {
    let continued: HashSet<(&str, NodeId)> = entries
        .iter()
        .flat_map(|e| e.parents.iter().map(move |p| (e.branch.as_str(), *p)))
        .collect();
    entries
        .iter()
        .filter(|entry| !continued.contains(&(entry.branch.as_str(), entry.node)))
        .map(|entry| RemoteHead {
            branch: entry.branch.clone(),
            node: entry.node,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(b: char) -> String {
        b.to_string().repeat(40)
    }

    #[test]
    fn test_parse_log_json() {
        let json = format!(
            r#"[
 {{"bookmarks": [], "branch": "default", "date": [0, 0], "desc": "first\n\nbody", "node": "{}", "parents": ["{}"], "phase": "draft", "rev": 0, "tags": [], "user": "t"}}
]"#,
            hex('a'),
            hex('0')
        );
        let entries: Vec<LogEntry> = parse_json_list(&json).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].branch, "default");
        assert_eq!(entries[0].desc, "first\n\nbody");
        assert_eq!(entries[0].parents, vec![NodeId::NULL]);
    }

    #[test]
    fn test_blank_output_is_empty_list() {
        let entries: Vec<LogEntry> = parse_json_list("  \n").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_bookmarks_json() {
        let json = format!(
            r#"[{{"active": true, "bookmark": "wip", "node": "{}", "rev": 3}}, {{"active": false, "bookmark": "old", "node": "{}", "rev": 1}}]"#,
            hex('b'),
            hex('c')
        );
        let entries: Vec<BookmarkEntry> = parse_json_list(&json).unwrap();
        assert_eq!(entries[0].bookmark, "wip");
        assert!(entries[0].active);
        assert!(!entries[1].active);
    }

    #[test]
    fn test_parse_node_lines_rejects_short_hash() {
        let nodes = parse_node_lines(&format!("{}\n{}\n", hex('a'), hex('b'))).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(parse_node_lines("abc123\n").is_err());
    }

    #[test]
    fn test_parse_pushkey_listing() {
        let listing = format!("stable\t{}\nfeature/x\t{}\n", hex('d'), hex('e'));
        let entries = parse_pushkey_bookmarks(&listing).unwrap();
        assert_eq!(entries[0].0, "stable");
        assert_eq!(entries[1].0, "feature/x");
        assert_eq!(entries[1].1.to_hex(), hex('e'));
    }

    #[test]
    fn test_malformed_pushkey_listing_is_protocol_failure() {
        assert!(matches!(
            parse_pushkey_bookmarks("no-tab-here\n"),
            Err(VcsError::ProtocolFailed { .. })
        ));
        assert!(matches!(
            parse_pushkey_bookmarks("name\tdeadbeef\n"),
            Err(VcsError::ProtocolFailed { .. })
        ));
    }

    #[test]
    fn test_parse_discovered_changesets() {
        let listing = format!(
            "{}\t{}\t{}\tdefault\n{}\t{}\t{}\tstable\n",
            hex('1'),
            hex('0'),
            hex('0'),
            hex('2'),
            hex('1'),
            hex('0')
        );
        let entries = parse_discovered_changesets(&listing).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].parents.is_empty());
        assert_eq!(entries[1].branch, "stable");
        assert_eq!(entries[1].parents, vec![NodeId::from_hex(&hex('1')).unwrap()]);

        let heads = heads_of(&entries);
        assert_eq!(heads.len(), 2);
        assert_eq!(heads[0].branch, "default");
        assert_eq!(heads[1].branch, "stable");
    }

    #[test]
    fn test_truncated_discovery_line_is_protocol_failure() {
        let listing = format!("{}\t{}\n", hex('1'), hex('0'));
        assert!(matches!(
            parse_discovered_changesets(&listing),
            Err(VcsError::ProtocolFailed { .. })
        ));
    }

    #[test]
    fn test_heads_of_discovered_set() {
        let node = |c| NodeId::from_hex(&hex(c)).unwrap();
        let entry = |c, branch: &str, parents: Vec<NodeId>| LogEntry {
            rev: 0,
            node: node(c),
            branch: branch.to_string(),
            desc: String::new(),
            parents,
        };
        let entries = vec![
            entry('1', "default", vec![NodeId::NULL]),
            entry('2', "default", vec![node('1')]),
            entry('3', "stable", vec![node('1')]),
        ];
        let heads = heads_of(&entries);
        assert_eq!(heads.len(), 2);
        assert_eq!(heads[0].branch, "default");
        assert_eq!(heads[0].node, node('2'));
        assert_eq!(heads[1].branch, "stable");
    }

    #[test]
    fn test_child_on_other_branch_keeps_parent_head() {
        let node = |c| NodeId::from_hex(&hex(c)).unwrap();
        let entry = |c, branch: &str, parents: Vec<NodeId>| LogEntry {
            rev: 0,
            node: node(c),
            branch: branch.to_string(),
            desc: String::new(),
            parents,
        };
        let entries = vec![
            entry('a', "default", vec![]),
            entry('b', "feature", vec![node('a')]),
            entry('c', "default", vec![node('a')]),
            entry('d', "default", vec![node('c'), node('b')]),
        ];
        let heads = heads_of(&entries);
        let names: Vec<(&str, NodeId)> =
            heads.iter().map(|h| (h.branch.as_str(), h.node)).collect();
        assert_eq!(names, vec![("feature", node('b')), ("default", node('d'))]);

        let heads = heads_of(&entries[..2]);
        let names: Vec<&str> = heads.iter().map(|h| h.branch.as_str()).collect();
        assert_eq!(names, vec!["default", "feature"]);
    }
}
