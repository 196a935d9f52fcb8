//! Integration tests for re-listing settled donations.

use foodshare_core::ErrorKind;
use foodshare_core::traits::RecordStore;
use foodshare_core::types::DonationId;
use foodshare_entity::donation::{Donation, DonationMethod, DonationStatus};
use foodshare_entity::schedule::{FulfillmentSchedule, ScheduleDetails};

use crate::helpers::{self, TestApp};

async fn rejected_donation(app: &TestApp) -> (DonationId, foodshare_service::RequestContext) {
    let donor = app.donor();
    let admin = app.admin();
    let id = app.create_pickup(&donor).await;
    app.app
        .donations
        .advance_status(&admin, id, DonationStatus::Rejected)
        .await
        .unwrap();
    (id, donor)
}

#[tokio::test]
async fn test_redonate_copies_a_delivered_donation() {
    let app = TestApp::new();
    let donor = app.donor();
    let ngo = app.ngo();
    let source = app
        .app
        .donations
        .create_donation(&donor, helpers::dropoff_request(donor.user_id, 7))
        .await
        .unwrap();
    app.app.donations.accept_donation(&ngo, source).await.unwrap();
    for to in [DonationStatus::Collected, DonationStatus::Delivered] {
        app.app
            .donations
            .advance_status(&ngo, source, to)
            .await
            .unwrap();
    }

    let copy_id = app.app.donations.redonate(&donor, source).await.unwrap();
    assert_ne!(copy_id, source);

    let original = app.app.donations.get_donation(source).await.unwrap();
    let copy = app.app.donations.get_donation(copy_id).await.unwrap();
    assert_eq!(copy.status, DonationStatus::Pending);
    assert_eq!(copy.collector_id, None);
    assert!(copy.is_redonation);
    assert_eq!(copy.original_donation_id, Some(source));
    assert_eq!(copy.item_name, original.item_name);
    assert_eq!(copy.quantity, 7);
    assert_eq!(copy.method, DonationMethod::Dropoff);
    assert_eq!(copy.expiry_date, original.expiry_date);
    assert!(copy.rejected_by.is_empty());

    let schedule = app
        .app
        .schedules
        .schedule_for(copy_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(copy.schedule_id, Some(schedule.id));
    assert!(matches!(
        schedule.details,
        ScheduleDetails::Dropoff { ref facility_name, .. } if facility_name == "Banque Alimentaire Nord"
    ));

    // The source is untouched.
    assert_eq!(original.status, DonationStatus::Delivered);
    let stats = app.app.stats.stats_for(donor.user_id).await.unwrap();
    assert_eq!(stats.total_donations, 2);
    assert_eq!(stats.delivered_donations, 1);
    assert_eq!(stats.waste_prevented, 7);

    let mine = app
        .app
        .donations
        .donations_by_donor(donor.user_id)
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id, copy_id);
}

#[tokio::test]
async fn test_redonate_with_missing_category_writes_nothing() {
    let app = TestApp::new();
    let (id, donor) = rejected_donation(&app).await;

    let mut doc = app
        .store
        .get(Donation::COLLECTION, &id.key())
        .await
        .unwrap()
        .unwrap();
    doc.remove("category");
    app.store
        .set(Donation::COLLECTION, &id.key(), doc)
        .await
        .unwrap();

    let err = app.app.donations.redonate(&donor, id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingFields);
    assert!(err.message.contains("category"));
    assert_eq!(app.count(Donation::COLLECTION), 1);
    assert_eq!(app.count(FulfillmentSchedule::COLLECTION), 1);
}

#[tokio::test]
async fn test_redonate_without_schedule_is_missing_fields() {
    let app = TestApp::new();
    let (id, donor) = rejected_donation(&app).await;
    app.store
        .delete(FulfillmentSchedule::COLLECTION, &id.key())
        .await
        .unwrap();

    let err = app.app.donations.redonate(&donor, id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingFields);
    assert_eq!(app.count(Donation::COLLECTION), 1);
}

#[tokio::test]
async fn test_redonate_requires_a_settled_donation() {
    let app = TestApp::new();
    let donor = app.donor();
    let id = app.create_pickup(&donor).await;

    let err = app.app.donations.redonate(&donor, id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);

    let err = app
        .app
        .donations
        .redonate(&donor, DonationId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_redonate_by_donor_or_admin_only() {
    let app = TestApp::new();
    let (id, _donor) = rejected_donation(&app).await;

    let stranger = app.donor();
    let err = app.app.donations.redonate(&stranger, id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let admin = app.admin();
    let copy = app.app.donations.redonate(&admin, id).await.unwrap();
    let copy = app.app.donations.get_donation(copy).await.unwrap();
    assert_eq!(copy.original_donation_id, Some(id));
    assert_eq!(copy.status, DonationStatus::Pending);
}
