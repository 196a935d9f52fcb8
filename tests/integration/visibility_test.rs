//! Integration tests for the per-NGO pending list.

use foodshare_core::ErrorKind;
use foodshare_entity::donation::DonationStatus;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_rejecting_ngo_no_longer_sees_donation() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo1 = app.ngo();
    let ngo2 = app.ngo();
    let id = app.create_pickup(&donor).await;

    app.app.donations.reject_by_ngo(&ngo1, id).await.unwrap();

    let hidden = app
        .app
        .visibility
        .visible_pending_snapshot(ngo1.user_id)
        .await
        .unwrap();
    assert!(hidden.is_empty());

    let shown = app
        .app
        .visibility
        .visible_pending_snapshot(ngo2.user_id)
        .await
        .unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].id, id);
    assert_eq!(shown[0].status, DonationStatus::Pending);
    assert!(shown[0].rejected_by.contains(&ngo1.user_id));
}

#[tokio::test]
async fn test_reject_is_idempotent_and_pending_only() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();
    let id = app.create_pickup(&donor).await;

    app.app.donations.reject_by_ngo(&ngo, id).await.unwrap();
    app.app.donations.reject_by_ngo(&ngo, id).await.unwrap();
    let stored = app.app.donations.get_donation(id).await.unwrap();
    assert_eq!(stored.rejected_by.len(), 1);

    let err = app.app.donations.reject_by_ngo(&donor, id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let other = app.ngo();
    let accepted = app.create_accepted(&donor, &other).await;
    let err = app
        .app
        .donations
        .reject_by_ngo(&ngo, accepted)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);
}

#[tokio::test]
async fn test_pending_list_is_newest_first() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();

    let mut created = Vec::new();
    for _ in 0..3 {
        created.push(app.create_pickup(&donor).await);
    }
    let accepted = app.create_accepted(&donor, &app.ngo()).await;

    let listed: Vec<_> = app
        .app
        .visibility
        .visible_pending_snapshot(ngo.user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    created.reverse();
    assert_eq!(listed, created);
    assert!(!listed.contains(&accepted));
}

#[tokio::test]
async fn test_live_pending_list_follows_changes() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();
    let mut pending = app.app.visibility.visible_pending(ngo.user_id).await.unwrap();

    assert!(helpers::next_snapshot(&mut pending).await.is_empty());

    let id = app.create_pickup(&donor).await;
    let snapshot = helpers::next_snapshot(&mut pending).await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, id);

    app.app.donations.reject_by_ngo(&ngo, id).await.unwrap();
    assert!(helpers::next_snapshot(&mut pending).await.is_empty());
}

#[tokio::test]
async fn test_accepted_donation_leaves_every_list() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo1 = app.ngo();
    let ngo2 = app.ngo();
    let id = app.create_pickup(&donor).await;
    let mut watching = app.app.visibility.visible_pending(ngo2.user_id).await.unwrap();
    assert_eq!(helpers::next_snapshot(&mut watching).await.len(), 1);

    app.app.donations.accept_donation(&ngo1, id).await.unwrap();

    assert!(helpers::next_snapshot(&mut watching).await.is_empty());
    for ngo in [&ngo1, &ngo2] {
        let list = app
            .app
            .visibility
            .visible_pending_snapshot(ngo.user_id)
            .await
            .unwrap();
        assert!(list.is_empty());
    }
}
