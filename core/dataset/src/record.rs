//! FILENAME: core/dataset/src/record.rs
//! Raw transaction records as handed over by the loading layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

// ============================================================================
// SEASON
// ============================================================================

/// The season a purchase was made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// All seasons in calendar order.
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(LookupError::UnknownSeason(s.to_string())),
        }
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One retail transaction.
/// Records are never modified after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Customer age in whole years.
    pub age: u32,

    /// Customer gender as recorded in the source ("Male", "Female", ...).
    pub gender: String,

    /// Full region (US state) name, e.g. "California".
    pub region: String,

    pub season: Season,

    /// Item name, e.g. "Blouse".
    pub item: String,

    /// Item category, e.g. "Clothing".
    pub category: String,

    /// Review rating, bounded and possibly fractional.
    pub review_rating: f64,

    /// Purchase amount in USD.
    pub purchase_amount: f64,

    /// Number of previous purchases by the same customer.
    pub previous_purchases: u32,
}

impl Record {
    /// Creates a record with the categorical fields set and all numbers zeroed.
    /// Mostly useful for fixtures; chain the `with_*` setters for the rest.
    pub fn new(
        gender: impl Into<String>,
        region: impl Into<String>,
        season: Season,
        item: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Record {
            age: 0,
            gender: gender.into(),
            region: region.into(),
            season,
            item: item.into(),
            category: category.into(),
            review_rating: 0.0,
            purchase_amount: 0.0,
            previous_purchases: 0,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = age;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.review_rating = rating;
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.purchase_amount = amount;
        self
    }

    pub fn with_previous_purchases(mut self, count: u32) -> Self {
        self.previous_purchases = count;
        self
    }
}
