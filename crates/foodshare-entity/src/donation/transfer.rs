//! Fields copied from a terminal donation into its redonation.

use chrono::NaiveDate;
use foodshare_core::types::{Document, UserId};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::category::{FoodCategory, ImpactType};
use super::method::DonationMethod;

/// The parts of a donation that carry over to a redonation.
///
/// Built from the raw stored document rather than a typed [`super::Donation`]
/// because older records may lack fields the typed model requires.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferableFields {
    /// What is being donated.
    pub item_name: String,
    /// How many units.
    pub quantity: u32,
    /// Unit of `quantity`.
    pub unit: String,
    /// Food category.
    pub category: FoodCategory,
    /// Impact type.
    pub impact_type: ImpactType,
    /// Pickup or drop-off.
    pub method: DonationMethod,
    /// The original donor.
    pub donor_id: UserId,
    /// Donor display name; empty if the source lacks one.
    pub donor_name: String,
    /// Donor city; empty if the source lacks one.
    pub donor_city: String,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Optional manufacturing date.
    pub manufacturing_date: Option<NaiveDate>,
    /// Optional expiry date.
    pub expiry_date: Option<NaiveDate>,
}

impl TransferableFields {
    /// Extract the transferable fields from a stored donation document.
    ///
    /// Returns the stored names of every required field that is absent,
    /// `null`, blank, or unreadable.
    pub fn from_document(doc: &Document) -> Result<Self, Vec<&'static str>> {
        let mut missing = Vec::new();

        let item_name = required_text(doc, "item", &mut missing);
        let quantity = required::<u32>(doc, "quantity", &mut missing).filter(|q| *q > 0);
        if quantity.is_none() && !missing.contains(&"quantity") {
            missing.push("quantity");
        }
        let unit = required_text(doc, "unit", &mut missing);
        let category = required::<FoodCategory>(doc, "category", &mut missing);
        let impact_type = required::<ImpactType>(doc, "impactType", &mut missing);
        let method = required::<DonationMethod>(doc, "method", &mut missing);
        let donor_id = required::<UserId>(doc, "donorId", &mut missing);

        match (
            item_name,
            quantity,
            unit,
            category,
            impact_type,
            method,
            donor_id,
        ) {
            (
                Some(item_name),
                Some(quantity),
                Some(unit),
                Some(category),
                Some(impact_type),
                Some(method),
                Some(donor_id),
            ) => Ok(Self {
                item_name,
                quantity,
                unit,
                category,
                impact_type,
                method,
                donor_id,
                donor_name: optional(doc, "donorName").unwrap_or_default(),
                donor_city: optional(doc, "donorCity").unwrap_or_default(),
                image_url: optional(doc, "imageUrl"),
                manufacturing_date: optional(doc, "manufacturingDate"),
                expiry_date: optional(doc, "expiryDate"),
            }),
            _ => Err(missing),
        }
    }
}

fn required<T: DeserializeOwned>(
    doc: &Document,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<T> {
    let value = optional(doc, field);
    if value.is_none() {
        missing.push(field);
    }
    value
}

fn required_text(
    doc: &Document,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    let value = optional::<String>(doc, field).filter(|s| !s.trim().is_empty());
    if value.is_none() {
        missing.push(field);
    }
    value
}

fn optional<T: DeserializeOwned>(doc: &Document, field: &str) -> Option<T> {
    match doc.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => serde_json::from_value(value.clone()).ok(),
    }
}
