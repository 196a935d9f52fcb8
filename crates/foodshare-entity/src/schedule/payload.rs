//! Caller-supplied schedule fields, before method validation.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use foodshare_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use super::model::ScheduleDetails;
use crate::donation::DonationMethod;

/// Flat, all-optional schedule fields as a form submits them.
///
/// [`SchedulePayload::into_details`] checks them against the donation
/// method and produces the tagged [`ScheduleDetails`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    /// Pickup street address.
    pub pickup_address: Option<String>,
    /// Pickup city.
    pub pickup_city: Option<String>,
    /// Pickup country.
    pub pickup_country: Option<String>,
    /// Pickup time.
    pub pickup_date_time: Option<DateTime<Utc>>,
    /// Drop-off facility.
    pub facility_name: Option<String>,
    /// Drop-off day.
    pub dropoff_date: Option<NaiveDate>,
    /// Drop-off time of day.
    pub dropoff_time: Option<NaiveTime>,
}

impl SchedulePayload {
    /// A complete pickup payload.
    pub fn pickup(
        address: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            pickup_address: Some(address.into()),
            pickup_city: Some(city.into()),
            pickup_country: Some(country.into()),
            pickup_date_time: Some(at),
            ..Self::default()
        }
    }

    /// A complete drop-off payload.
    pub fn dropoff(facility: impl Into<String>, date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            facility_name: Some(facility.into()),
            dropoff_date: Some(date),
            dropoff_time: Some(time),
            ..Self::default()
        }
    }

    /// Validate the payload for `method` and convert it to tagged details.
    ///
    /// Every field of the chosen method must be present and non-blank; every
    /// field of the other method must be absent.
    pub fn into_details(self, method: DonationMethod) -> AppResult<ScheduleDetails> {
        let stray = self.foreign_fields(method);
        if !stray.is_empty() {
            return Err(AppError::validation(format!(
                "Fields not allowed for method {method}: {}",
                stray.join(", ")
            )));
        }

        let mut missing = Vec::new();
        match method {
            DonationMethod::LocationPickup => {
                let address = non_blank(self.pickup_address, "pickupAddress", &mut missing);
                let city = non_blank(self.pickup_city, "pickupCity", &mut missing);
                let country = non_blank(self.pickup_country, "pickupCountry", &mut missing);
                if self.pickup_date_time.is_none() {
                    missing.push("pickupDateTime");
                }
                match (address, city, country, self.pickup_date_time) {
                    (Some(pickup_address), Some(pickup_city), Some(pickup_country), Some(at)) => {
                        Ok(ScheduleDetails::LocationPickup {
                            pickup_address,
                            pickup_city,
                            pickup_country,
                            pickup_date_time: at,
                        })
                    }
                    _ => Err(missing_error(method, &missing)),
                }
            }
            DonationMethod::Dropoff => {
                let facility = non_blank(self.facility_name, "facilityName", &mut missing);
                if self.dropoff_date.is_none() {
                    missing.push("dropoffDate");
                }
                if self.dropoff_time.is_none() {
                    missing.push("dropoffTime");
                }
                match (facility, self.dropoff_date, self.dropoff_time) {
                    (Some(facility_name), Some(dropoff_date), Some(dropoff_time)) => {
                        Ok(ScheduleDetails::Dropoff {
                            facility_name,
                            dropoff_date,
                            dropoff_time,
                        })
                    }
                    _ => Err(missing_error(method, &missing)),
                }
            }
        }
    }

    fn foreign_fields(&self, method: DonationMethod) -> Vec<&'static str> {
        let mut present = Vec::new();
        match method {
            DonationMethod::LocationPickup => {
                if self.facility_name.is_some() {
                    present.push("facilityName");
                }
                if self.dropoff_date.is_some() {
                    present.push("dropoffDate");
                }
                if self.dropoff_time.is_some() {
                    present.push("dropoffTime");
                }
            }
            DonationMethod::Dropoff => {
                if self.pickup_address.is_some() {
                    present.push("pickupAddress");
                }
                if self.pickup_city.is_some() {
                    present.push("pickupCity");
                }
                if self.pickup_country.is_some() {
                    present.push("pickupCountry");
                }
                if self.pickup_date_time.is_some() {
                    present.push("pickupDateTime");
                }
            }
        }
        present
    }
}

impl From<ScheduleDetails> for SchedulePayload {
    fn from(details: ScheduleDetails) -> Self {
        match details {
            ScheduleDetails::LocationPickup {
                pickup_address,
                pickup_city,
                pickup_country,
                pickup_date_time,
            } => Self::pickup(pickup_address, pickup_city, pickup_country, pickup_date_time),
            ScheduleDetails::Dropoff {
                facility_name,
                dropoff_date,
                dropoff_time,
            } => Self::dropoff(facility_name, dropoff_date, dropoff_time),
        }
    }
}

fn non_blank(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    let value = value.filter(|s| !s.trim().is_empty());
    if value.is_none() {
        missing.push(field);
    }
    value
}

fn missing_error(method: DonationMethod, missing: &[&str]) -> AppError {
    AppError::validation(format!(
        "Missing fields for method {method}: {}",
        missing.join(", ")
    ))
}
