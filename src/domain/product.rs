use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::expiration::{ExpirationStatus, days_until_expiration};
use crate::domain::types::{CategoryName, DocumentId, MediaUrl, ProductCode};

/// Energy per gram of carbohydrates.
pub const KCAL_PER_GRAM_CARBOHYDRATES: f64 = 4.0;
/// Energy per gram of protein.
pub const KCAL_PER_GRAM_PROTEINS: f64 = 4.0;
/// Energy per gram of fat.
pub const KCAL_PER_GRAM_FATS: f64 = 9.0;
/// Energy per gram of alcohol.
pub const KCAL_PER_GRAM_ALCOHOL: f64 = 7.0;

/// Nutrition facts printed on the package, in grams and kilocalories.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Nutrition {
    pub carbohydrates: f64,
    pub proteins: f64,
    pub fats: f64,
    pub alcohol: f64,
    /// Declared total, not recomputed from the macros.
    pub total_kcal: f64,
}

impl Nutrition {
    pub fn carbohydrates_kcal(&self) -> f64 {
        self.carbohydrates * KCAL_PER_GRAM_CARBOHYDRATES
    }

    pub fn proteins_kcal(&self) -> f64 {
        self.proteins * KCAL_PER_GRAM_PROTEINS
    }

    pub fn fats_kcal(&self) -> f64 {
        self.fats * KCAL_PER_GRAM_FATS
    }

    pub fn alcohol_kcal(&self) -> f64 {
        self.alcohol * KCAL_PER_GRAM_ALCOHOL
    }

    /// Alcohol is only listed for products that contain some.
    pub fn has_alcohol(&self) -> bool {
        self.alcohol > 0.0
    }
}

/// A product snapshot normalized from a store document.
///
/// Instances are rebuilt on every scan and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: DocumentId,
    pub product_id: ProductCode,
    pub name: String,
    pub description: String,
    pub category: CategoryName,
    pub price: f64,
    pub is_halal: bool,
    pub created_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub nutrition: Nutrition,
    pub product_image: Option<MediaUrl>,
    pub certificate_file: Option<MediaUrl>,
    pub qr_code_url: Option<MediaUrl>,
    pub product_url: Option<MediaUrl>,
    pub created_by: String,
    /// Explicitly linked substitute product.
    pub alternative: Option<DocumentId>,
}

impl Product {
    /// Whole days left until expiry, rounded up.
    pub fn days_until_expiration(&self, now: DateTime<Utc>) -> i64 {
        days_until_expiration(self.expiration_date, now)
    }

    pub fn expiration_status(&self, now: DateTime<Utc>) -> ExpirationStatus {
        ExpirationStatus::from_days(self.days_until_expiration(now))
    }

    /// Returns `true` when both products share the same category, including
    /// the case where both are uncategorized.
    pub fn same_category(&self, other: &Product) -> bool {
        self.category == other.category
    }
}
