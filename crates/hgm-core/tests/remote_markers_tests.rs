// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Remote marker collection against a scripted remote.

use hgm_core::{
    ErrorKind, MarkerKind, MarkersEnumerator, RemoteMarkersEnumerator, collect_remote_markers,
};
use hgm_test_utils::{FailurePoint, FakeRemote, node};

fn populated() -> FakeRemote {
    FakeRemote::new()
        .with_alias("default", "https://hg.example.org/repo")
        .with_head("default", node(1))
        .with_head("stable", node(2))
        .with_bookmark("release", node(2))
        .with_bookmark("next", node(3))
}

#[tokio::test]
async fn test_branches_then_bookmarks() {
    let remote = populated();
    let markers = collect_remote_markers(&remote, "default").await.unwrap();

    let identities: Vec<(MarkerKind, &str, _)> = markers
        .iter()
        .map(|m| (m.kind, m.name.as_deref().unwrap_or(""), m.node))
        .collect();
    assert_eq!(
        identities,
        vec![
            (MarkerKind::Branch, "default", Some(node(1))),
            (MarkerKind::Branch, "stable", Some(node(2))),
            (MarkerKind::Bookmark, "release", Some(node(2))),
            (MarkerKind::Bookmark, "next", Some(node(3))),
        ]
    );
    assert_eq!(
        remote.calls(),
        vec!["resolve", "connect", "acquire", "discover", "release", "bookmarks"]
    );
}

#[tokio::test]
async fn test_remote_markers_leave_flags_unset() {
    let markers = collect_remote_markers(&populated(), "default").await.unwrap();
    for marker in &markers {
        assert_eq!(marker.is_active, None);
        assert_eq!(marker.is_closed, None);
        assert_eq!(marker.is_tip, None);
        assert_eq!(marker.is_current, None);
        assert_eq!(marker.description, None);
    }
}

#[tokio::test]
async fn test_empty_remote() {
    let remote = FakeRemote::new();
    let markers = collect_remote_markers(&remote, "/srv/empty").await.unwrap();
    assert!(markers.is_empty());
    assert_eq!(remote.acquired(), 1);
    assert_eq!(remote.released(), 1);
}

#[tokio::test]
async fn test_staging_released_on_success() {
    let remote = populated();
    collect_remote_markers(&remote, "default").await.unwrap();
    assert_eq!(remote.acquired(), 1);
    assert_eq!(remote.released(), 1);
}

#[tokio::test]
async fn test_staging_released_when_discovery_fails() {
    let remote = populated().failing_at(FailurePoint::Discover);
    let err = collect_remote_markers(&remote, "default").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProtocolFailed);
    assert_eq!(remote.acquired(), 1);
    assert_eq!(remote.released(), 1);
    assert!(!remote.calls().contains(&"bookmarks"));
}

#[tokio::test]
async fn test_release_failure_after_discovery_aborts() {
    let remote = populated().failing_at(FailurePoint::Release);
    let err = collect_remote_markers(&remote, "default").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!remote.calls().contains(&"bookmarks"));
}

#[tokio::test]
async fn test_discovery_error_wins_over_release_error() {
    let remote = populated()
        .failing_at(FailurePoint::Discover)
        .failing_at(FailurePoint::Release);
    let err = collect_remote_markers(&remote, "default").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProtocolFailed);
    assert_eq!(remote.released(), 1);
}

#[tokio::test]
async fn test_resolution_failure_touches_nothing() {
    let remote = populated().failing_at(FailurePoint::Resolve);
    let err = collect_remote_markers(&remote, "nowhere").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResolutionFailed);
    assert_eq!(remote.calls(), vec!["resolve"]);
    assert_eq!(remote.acquired(), 0);
}

#[tokio::test]
async fn test_connection_failure() {
    let remote = populated().failing_at(FailurePoint::Connect);
    let err = collect_remote_markers(&remote, "default").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConnectionFailed);
    assert_eq!(remote.acquired(), 0);
    assert_eq!(remote.released(), 0);
}

#[tokio::test]
async fn test_failed_acquire_is_not_released() {
    let remote = populated().failing_at(FailurePoint::Acquire);
    let err = collect_remote_markers(&remote, "default").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(remote.acquired(), 0);
    assert_eq!(remote.released(), 0);
    assert!(!remote.calls().contains(&"discover"));
}

#[tokio::test]
async fn test_bookmark_failure_drops_branch_markers() {
    let remote = populated().failing_at(FailurePoint::Bookmarks);
    let result = collect_remote_markers(&remote, "default").await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::ProtocolFailed);
    assert_eq!(remote.released(), 1);
}

#[tokio::test]
async fn test_enumerator_describes_location() {
    let enumerator = RemoteMarkersEnumerator::new(populated(), "default");
    assert_eq!(enumerator.description(), "default");

    let markers = enumerator.list_markers().await.unwrap();
    assert_eq!(markers.len(), 4);
    assert_eq!(enumerator.access().released(), 1);
}
