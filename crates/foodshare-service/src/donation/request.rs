//! Donation request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use foodshare_core::types::{DonationId, UserId};
use foodshare_entity::donation::{DonationMethod, FoodCategory, ImpactType};
use foodshare_entity::schedule::SchedulePayload;

/// Create donation request.
///
/// `donation_id` is generated by the client before the first attempt, so a
/// retried request addresses the same donation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_dates"))]
pub struct CreateDonationRequest {
    /// Client-generated donation ID.
    pub donation_id: DonationId,
    /// The donor; must be the caller.
    pub donor_id: UserId,
    /// What is being donated.
    #[validate(
        length(min = 1, max = 200, message = "Item name is required"),
        custom(function = "not_blank")
    )]
    pub item_name: String,
    /// How many units. Signed so that negative input reaches validation.
    #[validate(range(min = 1, max = 4_294_967_295_i64, message = "Quantity must be a positive integer"))]
    pub quantity: i64,
    /// Unit of `quantity`.
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub unit: String,
    /// Food category.
    pub category: FoodCategory,
    /// Impact type.
    pub impact_type: ImpactType,
    /// Pickup or drop-off.
    pub method: DonationMethod,
    /// Schedule fields for `method`.
    pub schedule: SchedulePayload,
    /// Optional image URL; must not be empty when given.
    #[validate(custom(function = "not_blank"))]
    pub image_url: Option<String>,
    /// When the food was made.
    pub manufacturing_date: Option<NaiveDate>,
    /// When the food expires.
    pub expiry_date: Option<NaiveDate>,
    /// Donor display name.
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub donor_name: String,
    /// Donor city.
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub donor_city: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_dates(request: &CreateDonationRequest) -> Result<(), ValidationError> {
    match (request.manufacturing_date, request.expiry_date) {
        (Some(made), Some(expires)) if expires < made => {
            let mut err = ValidationError::new("expiry_before_manufacturing");
            err.message = Some("Expiry date is before the manufacturing date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}
