// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Local marker collection against in-memory snapshots.

use hgm_core::{
    ErrorKind, LocalMarkersEnumerator, Marker, MarkerKind, MarkersEnumerator, NodeId,
    collect_local_markers, render_markers,
};
use hgm_repo::{BranchHeads, LocalRepoView, LocalSnapshot};
use hgm_test_utils::node;
use hgm_test_utils::scenarios::{self, message};

fn branch_markers(markers: &[Marker]) -> Vec<&Marker> {
    markers.iter().filter(|m| m.kind == MarkerKind::Branch).collect()
}

fn virtual_count(markers: &[Marker], kind: MarkerKind) -> usize {
    markers.iter().filter(|m| m.kind == kind && m.is_virtual()).count()
}

#[test]
fn test_single_head_working_copy_on_it() {
    let markers = collect_local_markers(&scenarios::single_head()).unwrap();

    assert_eq!(markers.len(), 1);
    let head = &markers[0];
    assert_eq!(head.kind, MarkerKind::Branch);
    assert_eq!(head.name.as_deref(), Some("default"));
    assert_eq!(head.node, Some(node(1)));
    assert_eq!(head.is_active, Some(true));
    assert_eq!(head.is_closed, Some(false));
    assert_eq!(head.is_tip, Some(true));
    assert_eq!(head.is_current, Some(true));
    assert_eq!(head.description, Some(message(1)));
}

#[test]
fn test_declared_branch_without_commits() {
    let markers = collect_local_markers(&scenarios::declared_branch()).unwrap();

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].is_current, Some(false));
    assert_eq!(markers[0].is_active, Some(true));
    assert_eq!(markers[1], Marker::virtual_branch("feature"));
    assert_eq!(markers[1].node, None);
    assert_eq!(markers[1].description, None);
}

#[test]
fn test_historical_checkout_adds_virtual_commit() {
    let markers = collect_local_markers(&scenarios::historical_checkout()).unwrap();

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].node, Some(node(2)));
    assert_eq!(markers[0].is_active, Some(false));
    assert_eq!(markers[0].is_current, Some(true));

    let commit = &markers[1];
    assert_eq!(commit.kind, MarkerKind::Commit);
    assert_eq!(commit.name, None);
    assert_eq!(commit.node, Some(node(1)));
    assert_eq!(commit.is_current, Some(true));
    assert_eq!(commit.is_active, Some(false));
    assert_eq!(commit.is_closed, Some(false));
    assert_eq!(commit.is_tip, Some(false));
    assert_eq!(commit.description, Some(message(1)));
}

#[test]
fn test_busy_repository_order_and_flags() {
    let markers = collect_local_markers(&scenarios::busy()).unwrap();

    let identities: Vec<(MarkerKind, Option<&str>, Option<NodeId>)> = markers
        .iter()
        .map(|m| (m.kind, m.name.as_deref(), m.node))
        .collect();
    assert_eq!(
        identities,
        vec![
            (MarkerKind::Branch, Some("default"), Some(node(2))),
            (MarkerKind::Branch, Some("default"), Some(node(3))),
            (MarkerKind::Branch, Some("stable"), Some(node(4))),
            (MarkerKind::Branch, Some("old"), Some(node(5))),
            (MarkerKind::Bookmark, Some("release"), Some(node(4))),
            (MarkerKind::Bookmark, Some("wip"), Some(node(6))),
        ]
    );

    // Working copy sits on the active bookmark, not on a head.
    assert!(markers[..4].iter().all(|m| m.is_active == Some(false)));
    assert_eq!(markers[4].is_active, Some(false));
    assert_eq!(markers[5].is_active, Some(true));
    assert_eq!(virtual_count(&markers, MarkerKind::Commit), 0);

    assert_eq!(markers[0].is_tip, Some(false));
    assert_eq!(markers[1].is_tip, Some(true));
    assert_eq!(markers[0].is_current, Some(true));
    assert_eq!(markers[2].is_current, Some(false));
}

#[test]
fn test_closed_has_two_independent_triggers() {
    let markers = collect_local_markers(&scenarios::busy()).unwrap();

    // `stable` is not explicitly closed but its head left the open set.
    assert_eq!(markers[2].name.as_deref(), Some("stable"));
    assert_eq!(markers[2].is_closed, Some(true));
    // `old` is explicitly closed even though its head is still a graph head.
    assert_eq!(markers[3].name.as_deref(), Some("old"));
    assert_eq!(markers[3].is_closed, Some(true));
    // Open heads on an open branch stay open.
    assert_eq!(markers[0].is_closed, Some(false));
    assert_eq!(markers[1].is_closed, Some(false));
}

#[test]
fn test_head_and_bookmark_on_same_node_both_emitted() {
    let markers = collect_local_markers(&scenarios::busy()).unwrap();
    let on_four: Vec<MarkerKind> = markers
        .iter()
        .filter(|m| m.node == Some(node(4)))
        .map(|m| m.kind)
        .collect();
    assert_eq!(on_four, vec![MarkerKind::Branch, MarkerKind::Bookmark]);
}

#[test]
fn test_empty_repository() {
    let markers = collect_local_markers(&scenarios::empty()).unwrap();

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0], Marker::virtual_branch("default"));
    assert_eq!(markers[1], Marker::virtual_commit(NodeId::NULL, ""));
}

#[test]
fn test_branch_marker_count_property() {
    for snapshot in [
        scenarios::single_head(),
        scenarios::declared_branch(),
        scenarios::historical_checkout(),
        scenarios::busy(),
        scenarios::empty(),
    ] {
        let markers = collect_local_markers(&snapshot).unwrap();
        let heads: usize = snapshot.branches().iter().map(|b| b.heads.len()).sum();
        let declared_known = snapshot
            .branches()
            .iter()
            .any(|b| b.name == snapshot.current_branch_name());

        let virtual_branches = virtual_count(&markers, MarkerKind::Branch);
        assert_eq!(virtual_branches, usize::from(!declared_known));
        assert_eq!(branch_markers(&markers).len(), heads + virtual_branches);

        let any_active = markers
            .iter()
            .filter(|m| m.kind != MarkerKind::Commit)
            .any(Marker::active);
        assert_eq!(virtual_count(&markers, MarkerKind::Commit), usize::from(!any_active));
    }
}

#[test]
fn test_exactly_one_tip_per_branch() {
    let snapshot = scenarios::busy();
    let markers = collect_local_markers(&snapshot).unwrap();
    for branch in snapshot.branches() {
        let tips: Vec<NodeId> = markers
            .iter()
            .filter(|m| {
                m.kind == MarkerKind::Branch && m.name.as_deref() == Some(branch.name.as_str())
            })
            .filter(|m| m.is_tip == Some(true))
            .filter_map(|m| m.node)
            .collect();
        assert_eq!(tips, vec![branch.tip], "branch {}", branch.name);
    }
}

#[test]
fn test_head_order_follows_view() {
    let snapshot = scenarios::described(3)
        .working_copy(node(1), "default")
        .branch(BranchHeads {
            name: "default".to_string(),
            heads: vec![node(3), node(1), node(2)],
            tip: node(3),
            closed: false,
        })
        .open_heads([node(1), node(2), node(3)])
        .build();

    let nodes: Vec<Option<NodeId>> = collect_local_markers(&snapshot)
        .unwrap()
        .iter()
        .map(|m| m.node)
        .collect();
    assert_eq!(nodes, vec![Some(node(3)), Some(node(1)), Some(node(2))]);
}

#[test]
fn test_missing_description_is_inconsistent_state() {
    let snapshot = LocalSnapshot::builder()
        .working_copy(node(1), "default")
        .branch(BranchHeads {
            name: "default".to_string(),
            heads: vec![node(1)],
            tip: node(1),
            closed: false,
        })
        .open_head(node(1))
        .build();

    let err = collect_local_markers(&snapshot).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InconsistentState);
}

#[test]
fn test_repeated_enumeration_is_identical() {
    let snapshot = scenarios::busy();
    let first = collect_local_markers(&snapshot).unwrap();
    let second = collect_local_markers(&snapshot).unwrap();
    assert_eq!(first, second);
    assert_eq!(render_markers(&first).unwrap(), render_markers(&second).unwrap());
}

#[test]
fn test_rendered_listing_decodes_to_same_markers() {
    let markers = collect_local_markers(&scenarios::busy()).unwrap();
    let rendered = render_markers(&markers).unwrap();
    let decoded: Vec<Marker> = serde_json::from_str(&rendered).unwrap();
    assert_eq!(decoded, markers);
}

#[tokio::test]
async fn test_enumerator_wraps_collector() {
    let enumerator = LocalMarkersEnumerator::new(scenarios::historical_checkout(), "/srv/repo");
    assert_eq!(enumerator.description(), "/srv/repo");

    let markers = enumerator.list_markers().await.unwrap();
    assert_eq!(markers, collect_local_markers(enumerator.view()).unwrap());
}
