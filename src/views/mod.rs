//! Text views rendered with Tera.
//!
//! Domain values are first flattened into serializable view models holding
//! display-ready strings, then rendered from the templates under
//! `templates/`.

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::domain::expiration::days_remaining_label;
use crate::domain::lookup::ProductLookup;
use crate::domain::product::Product;
use crate::scanner::session::{Alert, ScanPhase};

pub mod format;

use format::{format_amount, format_date, format_date_time, format_price};

const CARD_TEMPLATE: &str = "product/card.txt";
const DETAIL_TEMPLATE: &str = "product/detail.txt";
const STATUS_TEMPLATE: &str = "scanner/status.txt";
const ALERT_TEMPLATE: &str = "scanner/alert.txt";

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("failed to render view: {0}")]
    Render(#[from] tera::Error),
}

/// Summary used for the alternative and suggestion cards.
#[derive(Debug, Serialize)]
struct ProductCard {
    name: String,
    category: String,
    description: String,
    price: String,
    total_kcal: String,
    halal_label: &'static str,
}

#[derive(Debug, Serialize)]
struct NutritionRow {
    label: &'static str,
    grams: String,
    kcal: String,
}

#[derive(Debug, Serialize)]
struct DetailView {
    name: String,
    category: String,
    description: String,
    image: Option<String>,
    price: String,
    halal_label: &'static str,
    status_label: &'static str,
    status_color: &'static str,
    days_label: String,
    expiration: String,
    created: String,
    nutrition: Vec<NutritionRow>,
    total_kcal: String,
    certificate: Option<String>,
    qr_code_url: Option<String>,
    product_code: String,
    product_url: Option<String>,
    alternative: Option<ProductCard>,
    suggestions: Vec<ProductCard>,
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn halal_label(product: &Product) -> &'static str {
    if product.is_halal { "HALAL" } else { "NOT HALAL" }
}

impl ProductCard {
    fn new(product: &Product) -> Self {
        Self {
            name: or_fallback(&product.name, "Unknown Product"),
            category: or_fallback(&product.category, "Uncategorized"),
            description: product.description.clone(),
            price: format_price(product.price),
            total_kcal: format_amount(product.nutrition.total_kcal),
            halal_label: halal_label(product),
        }
    }
}

fn nutrition_rows(product: &Product) -> Vec<NutritionRow> {
    let nutrition = &product.nutrition;
    let mut rows = vec![
        NutritionRow {
            label: "Carbohydrates",
            grams: format_amount(nutrition.carbohydrates),
            kcal: format_amount(nutrition.carbohydrates_kcal()),
        },
        NutritionRow {
            label: "Proteins",
            grams: format_amount(nutrition.proteins),
            kcal: format_amount(nutrition.proteins_kcal()),
        },
        NutritionRow {
            label: "Fats",
            grams: format_amount(nutrition.fats),
            kcal: format_amount(nutrition.fats_kcal()),
        },
    ];
    if nutrition.has_alcohol() {
        rows.push(NutritionRow {
            label: "Alcohol",
            grams: format_amount(nutrition.alcohol),
            kcal: format_amount(nutrition.alcohol_kcal()),
        });
    }
    rows
}

/// Renders scanner screens as plain text.
#[derive(Debug)]
pub struct ViewRenderer {
    tera: Tera,
    /// Offset dates are displayed in.
    offset: FixedOffset,
}

impl ViewRenderer {
    /// Renderer displaying dates in the local timezone.
    pub fn new() -> Result<Self, ViewError> {
        Self::with_offset(*Local::now().offset())
    }

    pub fn with_offset(offset: FixedOffset) -> Result<Self, ViewError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (CARD_TEMPLATE, include_str!("../../templates/product/card.txt")),
            (DETAIL_TEMPLATE, include_str!("../../templates/product/detail.txt")),
            (STATUS_TEMPLATE, include_str!("../../templates/scanner/status.txt")),
            (ALERT_TEMPLATE, include_str!("../../templates/scanner/alert.txt")),
        ])?;
        Ok(Self { tera, offset })
    }

    /// Full detail view of a lookup, with expiry computed against `now`.
    pub fn render_detail(
        &self,
        lookup: &ProductLookup,
        now: DateTime<Utc>,
    ) -> Result<String, ViewError> {
        let product = &lookup.product;
        let days = product.days_until_expiration(now);
        let status = product.expiration_status(now);

        let view = DetailView {
            name: or_fallback(&product.name, "Unknown Product"),
            category: or_fallback(&product.category, "Uncategorized"),
            description: or_fallback(&product.description, "No description available"),
            image: product.product_image.as_ref().map(ToString::to_string),
            price: format_price(product.price),
            halal_label: halal_label(product),
            status_label: status.label(),
            status_color: status.color(),
            days_label: days_remaining_label(days),
            expiration: format_date_time(&product.expiration_date.with_timezone(&self.offset)),
            created: format_date(&product.created_date.with_timezone(&self.offset)),
            nutrition: nutrition_rows(product),
            total_kcal: format_amount(product.nutrition.total_kcal),
            certificate: product.certificate_file.as_ref().map(ToString::to_string),
            qr_code_url: product.qr_code_url.as_ref().map(ToString::to_string),
            product_code: product.product_id.to_string(),
            product_url: product.product_url.as_ref().map(ToString::to_string),
            alternative: lookup.alternative.as_ref().map(ProductCard::new),
            suggestions: lookup.suggestions.iter().map(ProductCard::new).collect(),
        };

        let context = Context::from_serialize(&view)?;
        Ok(self.tera.render(DETAIL_TEMPLATE, &context)?)
    }

    /// Status line for the scanner overlay.
    pub fn render_status(&self, phase: &ScanPhase) -> Result<String, ViewError> {
        let phase = match phase {
            ScanPhase::Idle => "idle",
            ScanPhase::Scanning { .. } => "scanning",
            ScanPhase::ShowingResult(_) => "showing",
        };
        let mut context = Context::new();
        context.insert("phase", phase);
        Ok(self.tera.render(STATUS_TEMPLATE, &context)?)
    }

    pub fn render_alert(&self, alert: Alert) -> Result<String, ViewError> {
        let mut context = Context::new();
        context.insert("message", alert.message());
        Ok(self.tera.render(ALERT_TEMPLATE, &context)?)
    }
}
