//! Integration tests for configuration loading and the in-memory container.

use foodshare::FoodShare;
use foodshare_core::config::AppConfig;
use foodshare_core::traits::IdentityProvider;
use foodshare_core::types::Role;
use foodshare_service::RequestContext;

#[test]
fn test_default_configuration_loads() {
    let config = foodshare::load_configuration().unwrap();
    assert_eq!(config.store.operation_timeout_ms, 5_000);
    assert_eq!(config.notifications.new_donation_audience, vec![Role::Admin, Role::Ngo]);

    foodshare::init_logging(&config.logging);
    // A second call keeps the first subscriber.
    foodshare::init_logging(&config.logging);
}

#[tokio::test]
async fn test_in_memory_container_serves_signed_in_caller() {
    let shared = FoodShare::in_memory(&AppConfig::default());
    let donor = shared.identity.register_new(Role::Donor);

    let err = RequestContext::resolve(shared.app.identity.as_ref())
        .await
        .unwrap_err();
    assert_eq!(err.kind, foodshare_core::ErrorKind::Forbidden);

    shared.identity.sign_in(donor);
    assert_eq!(shared.app.identity.current_caller_id(), Some(donor));
    let ctx = RequestContext::resolve(shared.app.identity.as_ref())
        .await
        .unwrap();
    assert_eq!(ctx.role, Role::Donor);

    let id = shared
        .app
        .donations
        .create_donation(&ctx, crate::helpers::pickup_request(donor, 2))
        .await
        .unwrap();
    assert_eq!(shared.store.count("donations"), 1);
    assert_eq!(
        shared.mirror.get(&donor).await.map(|s| s.total_donations),
        Some(1)
    );
    assert_eq!(shared.app.donations.get_donation(id).await.unwrap().quantity, 2);
}
