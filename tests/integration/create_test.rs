//! Integration tests for donation creation.

use foodshare_core::ErrorKind;
use foodshare_core::events::DonationEvent;
use foodshare_core::types::Role;
use foodshare_entity::audit::AuditLogEntry;
use foodshare_entity::donation::{Donation, DonationMethod, DonationStatus};
use foodshare_entity::notification::{NotificationEventType, NotificationRecord};
use foodshare_entity::schedule::{FulfillmentSchedule, ScheduleDetails, SchedulePayload};
use foodshare_entity::stats::DonorStats;

use std::sync::atomic::Ordering;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_create_pickup_donation() {
    let app = TestApp::new();
    let donor = app.donor();

    let id = app
        .app
        .donations
        .create_donation(&donor, helpers::pickup_request(donor.user_id, 3))
        .await
        .unwrap();

    let donation = app.app.donations.get_donation(id).await.unwrap();
    assert_eq!(donation.status, DonationStatus::Pending);
    assert_eq!(donation.collector_id, None);
    assert_eq!(donation.quantity, 3);
    assert_eq!(donation.donor_id, donor.user_id);
    assert!(!donation.is_redonation);

    let schedule = app.app.schedules.schedule_for(id).await.unwrap().unwrap();
    assert_eq!(donation.schedule_id, Some(schedule.id));
    assert_eq!(schedule.method(), DonationMethod::LocationPickup);
    match schedule.details {
        ScheduleDetails::LocationPickup {
            pickup_city,
            pickup_country,
            ..
        } => {
            assert_eq!(pickup_city, "Lille");
            assert_eq!(pickup_country, "France");
        }
        other => panic!("Expected a pickup schedule, got {other:?}"),
    }
    assert_eq!(app.count(FulfillmentSchedule::COLLECTION), 1);
}

#[tokio::test]
async fn test_zero_quantity_writes_nothing() {
    let app = TestApp::new();
    let donor = app.donor();

    let err = app
        .app
        .donations
        .create_donation(&donor, helpers::pickup_request(donor.user_id, 0))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.count(Donation::COLLECTION), 0);
    assert_eq!(app.count(FulfillmentSchedule::COLLECTION), 0);
    assert_eq!(app.count(NotificationRecord::COLLECTION), 0);
}

#[tokio::test]
async fn test_schedule_must_match_method() {
    let app = TestApp::new();
    let donor = app.donor();

    let mut request = helpers::pickup_request(donor.user_id, 2);
    request.method = DonationMethod::Dropoff;
    let err = app
        .app
        .donations
        .create_donation(&donor, request)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let mut request = helpers::pickup_request(donor.user_id, 2);
    request.schedule = SchedulePayload {
        pickup_city: None,
        ..request.schedule
    };
    let err = app
        .app
        .donations
        .create_donation(&donor, request)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.count(FulfillmentSchedule::COLLECTION), 0);
}

#[tokio::test]
async fn test_only_donors_create_for_themselves() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();

    let err = app
        .app
        .donations
        .create_donation(&ngo, helpers::pickup_request(ngo.user_id, 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let other = app.donor();
    let err = app
        .app
        .donations
        .create_donation(&other, helpers::pickup_request(donor.user_id, 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert_eq!(app.count(Donation::COLLECTION), 0);
}

#[tokio::test]
async fn test_retried_create_is_idempotent() {
    let app = TestApp::new();
    let donor = app.donor();
    let request = helpers::pickup_request(donor.user_id, 4);

    let first = app
        .app
        .donations
        .create_donation(&donor, request.clone())
        .await
        .unwrap();
    let second = app
        .app
        .donations
        .create_donation(&donor, request)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(app.count(Donation::COLLECTION), 1);
    assert_eq!(app.count(FulfillmentSchedule::COLLECTION), 1);
    // One direct and one audience notification, overwritten in place.
    assert_eq!(app.count(NotificationRecord::COLLECTION), 2);

    let stats = app.app.stats.stats_for(donor.user_id).await.unwrap();
    assert_eq!(stats.total_donations, 1);
}

#[tokio::test]
async fn test_reused_id_from_another_donor_conflicts() {
    let app = TestApp::new();
    let donor = app.donor();
    let request = helpers::pickup_request(donor.user_id, 4);
    app.app
        .donations
        .create_donation(&donor, request.clone())
        .await
        .unwrap();

    let thief = app.donor();
    let mut stolen = request;
    stolen.donor_id = thief.user_id;
    let err = app
        .app
        .donations
        .create_donation(&thief, stolen)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_failed_donation_write_removes_schedule() {
    let app = TestApp::new();
    let donor = app.donor();
    let mut events = app.app.donations.subscribe_events();
    app.flaky.fail_donation_insert.store(true, Ordering::SeqCst);

    let request = helpers::pickup_request(donor.user_id, 2);
    let id = request.donation_id;
    let err = app
        .app
        .donations
        .create_donation(&donor, request)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Internal);
    assert_eq!(app.count(Donation::COLLECTION), 0);
    assert_eq!(app.count(FulfillmentSchedule::COLLECTION), 0);

    let event = events.try_recv().unwrap();
    assert!(matches!(
        event.payload,
        DonationEvent::CreationRolledBack { donation_id, .. } if donation_id == id
    ));
    let audit = app.app.audit.entries_for(id).await.unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, "donation.creation_rolled_back");
    assert_eq!(app.count(AuditLogEntry::COLLECTION), 1);
}

#[tokio::test]
async fn test_timed_out_donation_write_removes_schedule() {
    let app = TestApp::new();
    let donor = app.donor();
    app.flaky.stall_donation_insert.store(true, Ordering::SeqCst);

    let request = helpers::pickup_request(donor.user_id, 2);
    let err = app
        .app
        .donations
        .create_donation(&donor, request.clone())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    assert_eq!(app.count(Donation::COLLECTION), 0);
    assert_eq!(app.count(FulfillmentSchedule::COLLECTION), 0);

    // The store recovers and the same request goes through.
    app.flaky.stall_donation_insert.store(false, Ordering::SeqCst);
    let id = app
        .app
        .donations
        .create_donation(&donor, request)
        .await
        .unwrap();
    assert!(app.app.schedules.schedule_for(id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_creation_notifies_donor_and_audience() {
    let app = TestApp::new();
    let donor = app.donor();
    let id = app.create_pickup(&donor).await;

    let inbox = app.app.inbox.inbox(&donor).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].event_type, NotificationEventType::DonationCreated);
    assert_eq!(inbox[0].related_donation_id, Some(id));

    let ngo = app.ngo();
    let inbox = app.app.inbox.inbox(&ngo).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].event_type, NotificationEventType::NewDonationAvailable);

    let stats: DonorStats = app.app.stats.stats_for(donor.user_id).await.unwrap();
    assert_eq!(stats.total_donations, 1);
    assert_eq!(stats.delivered_donations, 0);

    let other_donor = app.user(Role::Donor);
    assert!(app.app.inbox.inbox(&other_donor).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_retried_after_stats_outage_counts_once() {
    let app = TestApp::new();
    let donor = app.donor();
    let request = helpers::pickup_request(donor.user_id, 2);

    app.flaky.fail_stats_writes.store(true, Ordering::SeqCst);
    let err = app
        .app
        .donations
        .create_donation(&donor, request.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    app.flaky.fail_stats_writes.store(false, Ordering::SeqCst);
    assert_eq!(app.count(Donation::COLLECTION), 1);

    for _ in 0..2 {
        app.app
            .donations
            .create_donation(&donor, request.clone())
            .await
            .unwrap();
    }
    let stats = app.app.stats.stats_for(donor.user_id).await.unwrap();
    assert_eq!(stats.total_donations, 1);
}

#[tokio::test]
async fn test_retried_create_of_claimed_donation_skips_audience() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();
    let request = helpers::pickup_request(donor.user_id, 2);
    let id = app
        .app
        .donations
        .create_donation(&donor, request.clone())
        .await
        .unwrap();
    app.app.donations.accept_donation(&ngo, id).await.unwrap();

    let before = app.app.inbox.inbox(&ngo).await.unwrap();
    assert_eq!(before.len(), 1);

    app.app
        .donations
        .create_donation(&donor, request)
        .await
        .unwrap();
    assert_eq!(app.app.inbox.inbox(&ngo).await.unwrap(), before);
}
