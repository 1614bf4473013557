//! Feed, live channel and native display behavior of the assembled runtime.

mod common;

use common::{admin, eventually, settle, FakeIdentity, FakeNotifications, FakePlatform, Harness};
use console_config::timing::PERMISSION_RETRY_DELAY;
use console_runtime::{InteractionKind, PermissionState, RoutePolicy, SessionState};
use console_types::Role;
use notification_feed::ReadAck;
use serde_json::json;
use std::time::Duration;

fn signed_in(notifications: FakeNotifications, permission: PermissionState) -> Harness {
    Harness::new(
        FakeIdentity::verifying("tok", Ok(admin("u1"))),
        notifications,
        FakePlatform::new(permission),
        Some("tok"),
    )
}

fn ids(h: &Harness) -> Vec<String> {
    h.runtime
        .aggregator()
        .notifications()
        .into_iter()
        .map(|n| n.id)
        .collect()
}

#[tokio::test]
async fn test_redelivered_notification_is_ignored() {
    let h = signed_in(
        FakeNotifications::with_snapshot(vec![
            json!({ "id": 1, "type": "campaign", "title": "Spring promo", "isRead": false }),
        ]),
        PermissionState::Granted,
    );
    h.runtime.start();
    assert!(eventually(|| h.runtime.aggregator().is_live() && ids(&h) == ["1"]).await);

    h.transport
        .publish_json(r#"{"id": 1, "type": "campaign", "title": "Spring promo"}"#)
        .unwrap();
    settle().await;
    assert_eq!(ids(&h), ["1"]);
    assert_eq!(h.runtime.aggregator().unread_count(), 1);
    assert!(h.platform.displayed_tags().is_empty());

    h.transport
        .publish_json(r#"{"id": 2, "type": "campaign", "title": "Summer promo", "data": {"campaignId": 8}}"#)
        .unwrap();
    assert!(eventually(|| ids(&h) == ["2", "1"]).await);
    assert!(eventually(|| h.platform.displayed_tags() == ["notification-2"]).await);

    let view = h.runtime.view("/dashboard", &RoutePolicy::require(Role::Admin));
    assert_eq!(view.unread_count, 2);
}

#[tokio::test]
async fn test_optimistic_read_survives_failed_acknowledgment() {
    let mut notifications = FakeNotifications::with_snapshot(vec![
        json!({ "id": "a", "title": "First" }),
        json!({ "id": "b", "title": "Second" }),
    ]);
    notifications.fail_acks = true;
    let h = signed_in(notifications, PermissionState::Granted);
    h.runtime.start();
    assert!(eventually(|| h.runtime.aggregator().unread_count() == 2).await);

    assert!(h.runtime.aggregator().mark_read("a"));
    assert_eq!(h.runtime.aggregator().unread_count(), 1);

    assert!(eventually(|| h.notifications.acks.lock().len() == 1).await);
    settle().await;
    assert_eq!(*h.notifications.acks.lock(), vec![ReadAck::One("a".into())]);
    assert_eq!(h.runtime.aggregator().unread_count(), 1);
    assert_eq!(h.notifications.fetches(), 1);
}

#[tokio::test]
async fn test_failed_snapshot_still_receives_pushes() {
    let notifications = FakeNotifications {
        fail_snapshot: true,
        ..Default::default()
    };
    let h = signed_in(notifications, PermissionState::Granted);
    h.runtime.start();
    assert!(eventually(|| h.runtime.aggregator().is_live() && h.notifications.fetches() == 1).await);
    assert!(ids(&h).is_empty());

    h.transport
        .publish_json(r#"{"id": 9, "title": "Live only"}"#)
        .unwrap();
    assert!(eventually(|| ids(&h) == ["9"]).await);
}

#[tokio::test]
async fn test_logout_closes_channel_and_clears_feed() {
    let h = signed_in(
        FakeNotifications::with_snapshot(vec![json!({ "id": 1, "title": "One" })]),
        PermissionState::Granted,
    );
    h.runtime.start();
    assert!(eventually(|| ids(&h) == ["1"]).await);

    h.runtime.logout().unwrap();
    assert!(eventually(|| !h.transport.is_open()).await);
    assert!(eventually(|| ids(&h).is_empty()).await);
    assert_eq!(h.runtime.session_state(), SessionState::Unauthenticated);
    assert!(h.transport.publish_json(r#"{"id": 2, "title": "Late"}"#).is_err());
}

#[tokio::test]
async fn test_logout_during_stalled_snapshot_tears_down() {
    let notifications = FakeNotifications {
        stall_snapshot: true,
        ..Default::default()
    };
    let h = signed_in(notifications, PermissionState::Granted);
    h.runtime.start();
    assert!(eventually(|| h.runtime.aggregator().is_live() && h.notifications.fetches() == 1).await);

    h.transport
        .publish_json(r#"{"id": 4, "title": "While loading"}"#)
        .unwrap();
    assert!(eventually(|| ids(&h) == ["4"]).await);
    assert!(eventually(|| h.platform.displayed_tags() == ["notification-4"]).await);

    h.runtime.logout().unwrap();
    assert!(!h.runtime.aggregator().is_live());
    assert!(!h.transport.is_open());
    assert!(ids(&h).is_empty());

    assert!(h
        .transport
        .publish_json(r#"{"id": "secret", "title": "After logout"}"#)
        .is_err());
    settle().await;
    assert!(ids(&h).is_empty());
    assert_eq!(h.platform.displayed_tags(), ["notification-4"]);
}

#[tokio::test(start_paused = true)]
async fn test_permission_requests_are_bounded() {
    let h = signed_in(FakeNotifications::default(), PermissionState::Default);
    h.runtime.start();
    assert!(eventually(|| h.platform.requests() == 1).await);

    tokio::time::advance(PERMISSION_RETRY_DELAY + Duration::from_millis(1)).await;
    assert!(eventually(|| h.platform.requests() == 2).await);

    h.runtime.user_interacted(InteractionKind::Pointer);
    assert!(eventually(|| h.platform.requests() == 3).await);

    h.runtime.user_interacted(InteractionKind::Key);
    tokio::time::advance(Duration::from_secs(60)).await;
    settle().await;
    assert_eq!(h.platform.requests(), 3);
    assert_eq!(h.runtime.permission(), PermissionState::Default);
}

#[tokio::test]
async fn test_denied_permission_suppresses_display() {
    let h = signed_in(FakeNotifications::default(), PermissionState::Denied);
    h.runtime.start();
    assert!(eventually(|| h.runtime.aggregator().is_live()).await);

    h.transport
        .publish_json(r#"{"id": 3, "title": "Quiet"}"#)
        .unwrap();
    assert!(eventually(|| ids(&h) == ["3"]).await);
    settle().await;

    assert!(h.platform.displayed_tags().is_empty());
    assert_eq!(h.platform.requests(), 0);
}

#[tokio::test]
async fn test_shutdown_stops_live_delivery() {
    let h = signed_in(FakeNotifications::default(), PermissionState::Granted);
    h.runtime.start();
    assert!(eventually(|| h.runtime.aggregator().is_live()).await);

    h.runtime.shutdown();
    assert!(!h.runtime.aggregator().is_live());
    assert!(!h.transport.is_open());
}
