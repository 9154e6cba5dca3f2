// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Local repository access through `hg`

use hgm_domain_types::NodeId;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::parse::{BookmarkEntry, LogEntry, parse_json_list, parse_node_lines};
use crate::{BranchHeads, HgCommand, LocalSnapshot, VcsError, VcsResult};

/// A Mercurial repository on disk
#[derive(Debug, Clone)]
pub struct HgRepo {
    root: PathBuf,
    hg: HgCommand,
}

impl HgRepo {
    /// Open the repository containing `path` (the path itself or any ancestor
    /// holding a `.hg` directory).
    pub fn open(path: impl AsRef<Path>, hg: HgCommand) -> VcsResult<Self> {
        let root = find_root(path.as_ref())?;
        debug!(root = %root.display(), "opened repository");
        Ok(Self { root, hg })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn hg(&self) -> &HgCommand {
        &self.hg
    }

    fn run(&self, args: &[&str]) -> VcsResult<String> {
        self.hg.run(&self.root, args)
    }

    fn log(&self, revset: &str) -> VcsResult<Vec<LogEntry>> {
        parse_json_list(&self.run(&["log", "-r", revset, "-T", "json"])?)
    }

    fn nodes(&self, revset: &str) -> VcsResult<Vec<NodeId>> {
        parse_node_lines(&self.run(&["log", "-r", revset, "-T", "{node}\\n"])?)
    }

    /// Read everything the local collector needs into memory.
    pub fn snapshot(&self) -> VcsResult<LocalSnapshot> {
        let mut descriptions = HashMap::new();

        let (current, current_desc) = match self.log(".")?.into_iter().next() {
            Some(entry) => (entry.node, entry.desc),
            None => (NodeId::NULL, String::new()),
        };
        descriptions.insert(current, current_desc);

        let branch_output = self.run(&["branch"])?;
        let current_branch = branch_output.trim_end_matches(|c: char| c == '\r' || c == '\n');

        let heads = self.log("head()")?;
        let closed: HashSet<NodeId> = self.nodes("head() and closed()")?.into_iter().collect();
        let open_heads: HashSet<NodeId> = self.nodes("heads(all())")?.into_iter().collect();

        let mut builder = LocalSnapshot::builder()
            .working_copy(current, current_branch)
            .open_heads(open_heads);
        for branch in group_branch_heads(&heads, &closed) {
            builder = builder.branch(branch);
        }
        for entry in heads {
            descriptions.insert(entry.node, entry.desc);
        }

        let bookmarks: Vec<BookmarkEntry> =
            parse_json_list(&self.run(&["bookmarks", "-T", "json"])?)?;
        if !bookmarks.is_empty() {
            for entry in self.log("bookmark()")? {
                descriptions.insert(entry.node, entry.desc);
            }
        }
        let active = bookmarks.iter().find(|b| b.active).map(|b| b.bookmark.clone());
        for entry in bookmarks {
            builder = builder.bookmark(entry.bookmark, entry.node);
        }
        builder = builder.active_bookmark(active);

        for (node, desc) in descriptions {
            builder = builder.description(node, desc);
        }
        Ok(builder.build())
    }
}

/// Group heads (sorted by revision) into branches, ordered by each branch's
/// oldest head.
fn group_branch_heads(heads: &[LogEntry], closed: &HashSet<NodeId>) -> Vec<BranchHeads> {
    let mut sorted: Vec<&LogEntry> = heads.iter().collect();
    sorted.sort_by_key(|entry| entry.rev);

    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<(NodeId, bool)>> = HashMap::new();
    for entry in sorted {
        let name = entry.branch.as_str();
        if !grouped.contains_key(name) {
            order.push(name);
        }
        grouped
            .entry(name)
            .or_default()
            .push((entry.node, closed.contains(&entry.node)));
    }

    order
        .into_iter()
        .filter_map(|name| BranchHeads::from_revision_order(name, &grouped[name]))
        .collect()
}

/// Root of the repository containing `start`: the nearest directory at or
/// above it holding `.hg`.
pub fn find_root(start: &Path) -> VcsResult<PathBuf> {
    let start = start
        .canonicalize()
        .map_err(|_| VcsError::RepositoryNotFound(start.display().to_string()))?;
    start
        .ancestors()
        .find(|dir| dir.join(".hg").is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| VcsError::RepositoryNotFound(start.display().to_string()))
}
