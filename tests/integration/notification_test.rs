//! Integration tests for notification fan-out and the inbox.

use foodshare_core::ErrorKind;
use foodshare_core::types::{DonationId, Role};
use foodshare_entity::notification::{NotificationEventType, NotificationRecord};

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_repeated_notify_keeps_one_record() {
    let app = TestApp::new();
    let donor = app.donor();
    let donation = DonationId::new();

    for _ in 0..5 {
        app.app
            .notifications
            .notify(
                NotificationEventType::PickupReminder,
                Some(donation),
                Some(donor.user_id),
                None,
            )
            .await
            .unwrap();
    }

    assert_eq!(app.count(NotificationRecord::COLLECTION), 1);
    let inbox = app.app.inbox.inbox(&donor).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].related_donation_id, Some(donation));
    assert_eq!(inbox[0].title, NotificationEventType::PickupReminder.content().title);
}

#[tokio::test]
async fn test_notify_needs_exactly_one_target() {
    let app = TestApp::new();
    let donor = app.donor();

    let both = app
        .app
        .notifications
        .notify(
            NotificationEventType::ProfileUpdated,
            None,
            Some(donor.user_id),
            Some(vec![Role::Admin]),
        )
        .await
        .unwrap_err();
    assert_eq!(both.kind, ErrorKind::Validation);

    let neither = app
        .app
        .notifications
        .notify(NotificationEventType::ProfileUpdated, None, None, None)
        .await
        .unwrap_err();
    assert_eq!(neither.kind, ErrorKind::Validation);

    let empty = app
        .app
        .notifications
        .notify(NotificationEventType::ProfileUpdated, None, None, Some(vec![]))
        .await
        .unwrap_err();
    assert_eq!(empty.kind, ErrorKind::Validation);
    assert_eq!(app.count(NotificationRecord::COLLECTION), 0);
}

#[tokio::test]
async fn test_audience_reaches_roles_not_users() {
    let app = TestApp::new();
    let admin = app.admin();
    let ngo = app.ngo();
    let donor = app.donor();

    app.app
        .notifications
        .notify_audience(NotificationEventType::UserRegistered, None, &[Role::Admin])
        .await
        .unwrap();

    assert_eq!(app.app.inbox.inbox(&admin).await.unwrap().len(), 1);
    assert!(app.app.inbox.inbox(&ngo).await.unwrap().is_empty());
    assert!(app.app.inbox.inbox(&donor).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_inbox_merges_direct_and_audience_newest_first() {
    let app = TestApp::new();
    let ngo = app.ngo();

    app.app
        .notifications
        .notify_audience(NotificationEventType::DonationExpired, None, &[Role::Ngo])
        .await
        .unwrap();
    app.app
        .notifications
        .notify_user(NotificationEventType::UserApproved, None, ngo.user_id)
        .await
        .unwrap();

    let inbox = app.app.inbox.inbox(&ngo).await.unwrap();
    let events: Vec<_> = inbox.iter().map(|n| n.event_type).collect();
    assert_eq!(
        events,
        vec![
            NotificationEventType::UserApproved,
            NotificationEventType::DonationExpired,
        ]
    );
}

#[tokio::test]
async fn test_watch_inbox_follows_new_notifications() {
    let app = TestApp::new();
    let donor = app.donor();
    let mut inbox = app.app.inbox.watch_inbox(&donor).await.unwrap();

    assert!(helpers::next_snapshot(&mut inbox).await.is_empty());

    let id = app.create_pickup(&donor).await;
    let snapshot = helpers::next_snapshot(&mut inbox).await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].event_type, NotificationEventType::DonationCreated);
    assert_eq!(snapshot[0].related_donation_id, Some(id));

    let ngo = app.ngo();
    app.app.donations.accept_donation(&ngo, id).await.unwrap();
    let snapshot = helpers::next_snapshot(&mut inbox).await;
    assert_eq!(snapshot.len(), 2);
    assert_eq!(
        snapshot[0].event_type,
        NotificationEventType::NgoAssignedDonation
    );
}
