//! Integration tests for NGOs accepting donations.

use std::sync::atomic::Ordering;

use foodshare_core::ErrorKind;
use foodshare_core::events::DonationEvent;
use foodshare_core::types::DonationId;
use foodshare_entity::donation::{Donation, DonationStatus};
use foodshare_entity::notification::NotificationEventType;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_first_ngo_wins() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo1 = app.ngo();
    let ngo2 = app.ngo();
    let id = app.create_pickup(&donor).await;

    let accepted = app.app.donations.accept_donation(&ngo1, id).await.unwrap();
    assert_eq!(accepted.status, DonationStatus::Accepted);
    assert_eq!(accepted.collector_id, Some(ngo1.user_id));

    let err = app
        .app
        .donations
        .accept_donation(&ngo2, id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AlreadyClaimed);

    let stored = app.app.donations.get_donation(id).await.unwrap();
    assert_eq!(stored.collector_id, Some(ngo1.user_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_accepts_have_one_winner() {
    for _ in 0..20 {
        let app = TestApp::new();
        let donor = app.donor();
        let id = app.create_pickup(&donor).await;
        let ngos: Vec<_> = (0..4).map(|_| app.ngo()).collect();

        let handles: Vec<_> = ngos
            .iter()
            .cloned()
            .map(|ngo| {
                let donations = app.app.donations.clone();
                tokio::spawn(async move { (ngo.user_id, donations.accept_donation(&ngo, id).await) })
            })
            .collect();

        let mut winners = Vec::new();
        for handle in handles {
            let (ngo_id, result) = handle.await.unwrap();
            match result {
                Ok(donation) => {
                    assert_eq!(donation.collector_id, Some(ngo_id));
                    winners.push(ngo_id);
                }
                Err(e) => assert_eq!(e.kind, ErrorKind::AlreadyClaimed),
            }
        }

        assert_eq!(winners.len(), 1);
        let stored = app.app.donations.get_donation(id).await.unwrap();
        assert_eq!(stored.status, DonationStatus::Accepted);
        assert_eq!(stored.collector_id, Some(winners[0]));
    }
}

#[tokio::test]
async fn test_accepting_again_is_idempotent() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();
    let id = app.create_accepted(&donor, &ngo).await;

    let again = app.app.donations.accept_donation(&ngo, id).await.unwrap();
    assert_eq!(again.collector_id, Some(ngo.user_id));

    let inbox = app.app.inbox.inbox(&donor).await.unwrap();
    let assigned = inbox
        .iter()
        .filter(|n| n.event_type == NotificationEventType::NgoAssignedDonation)
        .count();
    assert_eq!(assigned, 1);
}

#[tokio::test]
async fn test_only_ngos_accept() {
    let app = TestApp::new();
    let donor = app.donor();
    let admin = app.admin();
    let id = app.create_pickup(&donor).await;

    for ctx in [&donor, &admin] {
        let err = app
            .app
            .donations
            .accept_donation(ctx, id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }
    let stored = app.app.donations.get_donation(id).await.unwrap();
    assert_eq!(stored.status, DonationStatus::Pending);
}

#[tokio::test]
async fn test_accept_unknown_or_settled_donation() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();
    let admin = app.admin();

    let err = app
        .app
        .donations
        .accept_donation(&ngo, DonationId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let id = app.create_pickup(&donor).await;
    app.app
        .donations
        .advance_status(&admin, id, DonationStatus::Rejected)
        .await
        .unwrap();
    let err = app
        .app
        .donations
        .accept_donation(&ngo, id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);
}

#[tokio::test]
async fn test_timed_out_accept_settles_on_stored_state() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();
    let id = app.create_pickup(&donor).await;
    let mut events = app.app.donations.subscribe_events();

    // The update lands but its acknowledgement never arrives.
    app.flaky.lose_update_ack.store(true, Ordering::SeqCst);
    let donation = app.app.donations.accept_donation(&ngo, id).await.unwrap();
    app.flaky.lose_update_ack.store(false, Ordering::SeqCst);

    assert_eq!(donation.status, DonationStatus::Accepted);
    assert_eq!(donation.collector_id, Some(ngo.user_id));
    let stored: Donation = app.app.donations.get_donation(id).await.unwrap();
    assert!(stored.collector_invariant_holds());

    let inbox = app.app.inbox.inbox(&donor).await.unwrap();
    assert!(
        inbox
            .iter()
            .any(|n| n.event_type == NotificationEventType::NgoAssignedDonation)
    );
    // The accept event is only published for an acknowledged write.
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_accept_publishes_event_and_notifies_donor() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();
    let id = app.create_pickup(&donor).await;
    let mut events = app.app.donations.subscribe_events();

    app.app.donations.accept_donation(&ngo, id).await.unwrap();

    let event = events.try_recv().unwrap();
    assert_eq!(event.actor_id, Some(ngo.user_id));
    match event.payload {
        DonationEvent::Accepted {
            donation_id,
            collector_id,
        } => {
            assert_eq!(donation_id, id);
            assert_eq!(collector_id, ngo.user_id);
        }
        other => panic!("Unexpected event {other:?}"),
    }

    let mine = app
        .app
        .donations
        .donations_by_collector(ngo.user_id)
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, id);
}

#[tokio::test]
async fn test_collector_cannot_reaccept_settled_donation() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();

    let rejected = app.create_accepted(&donor, &ngo).await;
    app.app
        .donations
        .advance_status(&ngo, rejected, DonationStatus::Rejected)
        .await
        .unwrap();

    let delivered = app.create_accepted(&donor, &ngo).await;
    for to in [DonationStatus::Collected, DonationStatus::Delivered] {
        app.app
            .donations
            .advance_status(&ngo, delivered, to)
            .await
            .unwrap();
    }

    let before = app.app.inbox.inbox(&donor).await.unwrap();
    for (id, status) in [
        (rejected, DonationStatus::Rejected),
        (delivered, DonationStatus::Delivered),
    ] {
        let err = app
            .app
            .donations
            .accept_donation(&ngo, id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidTransition, "{status}");
        let stored = app.app.donations.get_donation(id).await.unwrap();
        assert_eq!(stored.status, status);
    }

    // No acceptance notice is re-sent.
    assert_eq!(app.app.inbox.inbox(&donor).await.unwrap(), before);
}
