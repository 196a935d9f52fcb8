//! Food category and impact type enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of food being donated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FoodCategory {
    /// Fresh fruit.
    Fruits,
    /// Fresh vegetables.
    Vegetables,
    /// Prepared dishes.
    CookedMeals,
    /// Bread and pastries.
    Bakery,
    /// Tinned food.
    CannedMeals,
    /// Drinks.
    Beverages,
}

impl FoodCategory {
    /// Every category.
    pub const ALL: [Self; 6] = [
        Self::Fruits,
        Self::Vegetables,
        Self::CookedMeals,
        Self::Bakery,
        Self::CannedMeals,
        Self::Beverages,
    ];

    /// Return the category as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fruits => "fruits",
            Self::Vegetables => "vegetables",
            Self::CookedMeals => "cookedMeals",
            Self::Bakery => "bakery",
            Self::CannedMeals => "cannedMeals",
            Self::Beverages => "beverages",
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FoodCategory {
    type Err = foodshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                foodshare_core::AppError::validation(format!("Invalid food category: '{s}'"))
            })
    }
}

/// What a donation is counted towards once delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImpactType {
    /// Counted as meals handed out.
    MealsProvided,
    /// Counted as food saved from the bin.
    WastePrevented,
    /// Not counted towards either total.
    Other,
}

impl ImpactType {
    /// Return the impact type as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MealsProvided => "mealsProvided",
            Self::WastePrevented => "wastePrevented",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ImpactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImpactType {
    type Err = foodshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mealsProvided" => Ok(Self::MealsProvided),
            "wastePrevented" => Ok(Self::WastePrevented),
            "other" => Ok(Self::Other),
            _ => Err(foodshare_core::AppError::validation(format!(
                "Invalid impact type: '{s}'"
            ))),
        }
    }
}
