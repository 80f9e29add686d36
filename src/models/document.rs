use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::product::{Nutrition, Product};
use crate::domain::types::{CategoryName, DocumentId, MediaUrl, ProductCode};

/// Raw document as returned by the store: an untyped bag of fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct StoreDocument(Map<String, Value>);

impl StoreDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Internal record id (`$id`).
    pub fn id(&self) -> DocumentId {
        DocumentId::new(self.text("$id"))
    }

    /// Business identifier encoded in the QR code (`productId`).
    pub fn product_code(&self) -> ProductCode {
        ProductCode::new(self.text("productId"))
    }

    pub fn category(&self) -> CategoryName {
        CategoryName::new(self.text("category"))
    }

    /// Build the strict [`Product`] view of this document.
    ///
    /// Missing or mistyped fields fall back to defaults: empty text, zero,
    /// `false`, and `now` for dates. Nothing here fails.
    pub fn normalize(&self, now: DateTime<Utc>) -> Product {
        Product {
            id: self.id(),
            product_id: self.product_code(),
            name: self.text("name"),
            description: self.text("description"),
            category: self.category(),
            price: self.number("price"),
            is_halal: self.flag("isHalal"),
            created_date: self.date("createdDate", now),
            expiration_date: self.date("expirationDate", now),
            nutrition: Nutrition {
                carbohydrates: self.number("carbohydrates"),
                proteins: self.number("proteins"),
                fats: self.number("fats"),
                alcohol: self.number("alcohol"),
                total_kcal: self.number("totalKcal"),
            },
            product_image: self.url("productImage"),
            certificate_file: self.url("certificateFile"),
            qr_code_url: self.url("qrCodeUrl"),
            product_url: self.url("productUrl"),
            created_by: self.text("createdBy"),
            alternative: self.reference("alternative"),
        }
    }

    fn text(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::String(value)) => value.clone(),
            _ => String::new(),
        }
    }

    fn number(&self, field: &str) -> f64 {
        match self.0.get(field) {
            Some(Value::Number(value)) => value.as_f64().unwrap_or_default(),
            Some(Value::String(value)) => value.trim().parse::<f64>().unwrap_or_default(),
            _ => 0.0,
        }
    }

    fn flag(&self, field: &str) -> bool {
        matches!(self.0.get(field), Some(Value::Bool(true)))
    }

    fn date(&self, field: &str, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.0.get(field) {
            Some(Value::String(value)) if !value.is_empty() => {
                parse_store_date(value).unwrap_or_else(|| {
                    log::warn!(
                        "Unparseable {field} '{value}' on document '{}'",
                        self.text("$id")
                    );
                    now
                })
            }
            _ => now,
        }
    }

    fn url(&self, field: &str) -> Option<MediaUrl> {
        let value = self.text(field);
        if value.trim().is_empty() {
            return None;
        }
        match MediaUrl::new(value) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Ignoring {field} on document '{}': {e}", self.text("$id"));
                None
            }
        }
    }

    /// Relationship fields arrive either as a bare id or as an expanded
    /// document carrying its own `$id`.
    fn reference(&self, field: &str) -> Option<DocumentId> {
        let id = match self.0.get(field) {
            Some(Value::String(value)) => value.clone(),
            Some(Value::Object(related)) => match related.get("$id") {
                Some(Value::String(value)) => value.clone(),
                _ => String::new(),
            },
            _ => String::new(),
        };
        if id.is_empty() {
            None
        } else {
            Some(DocumentId::new(id))
        }
    }
}

impl From<Map<String, Value>> for StoreDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Parse the ISO-8601 variants the store emits.
///
/// Values without an offset are read as UTC; a bare date means midnight UTC.
pub fn parse_store_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| parsed.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn document(value: Value) -> StoreDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalizes_complete_document() {
        let doc = document(json!({
            "$id": "doc-1",
            "productId": "PRD-1",
            "name": "Yogurt",
            "description": "Plain yogurt",
            "category": "Dairy",
            "price": 12500,
            "isHalal": true,
            "createdDate": "2025-01-01T08:00:00.000+00:00",
            "expirationDate": "2025-04-01",
            "carbohydrates": 4.5,
            "proteins": 3,
            "fats": 1.2,
            "alcohol": 0,
            "totalKcal": 41,
            "productImage": "https://cdn.example.com/yogurt.png",
            "certificateFile": "https://cdn.example.com/cert.pdf",
            "qrCodeUrl": "https://cdn.example.com/qr.png",
            "productUrl": "",
            "createdBy": "admin",
            "alternative": "doc-2"
        }));

        let product = doc.normalize(now());

        assert_eq!(product.id, "doc-1");
        assert_eq!(product.product_id, "PRD-1");
        assert_eq!(product.category, "Dairy");
        assert_eq!(product.price, 12500.0);
        assert!(product.is_halal);
        assert_eq!(
            product.expiration_date,
            parse_store_date("2025-04-01T00:00:00Z").unwrap()
        );
        assert_eq!(product.nutrition.proteins, 3.0);
        assert_eq!(product.nutrition.total_kcal, 41.0);
        assert_eq!(
            product.certificate_file.as_ref().map(|u| u.as_str()),
            Some("https://cdn.example.com/cert.pdf")
        );
        assert!(product.product_url.is_none());
        assert_eq!(product.alternative, Some(DocumentId::new("doc-2")));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let product = document(json!({ "$id": "doc-9" })).normalize(now());

        assert_eq!(product.product_id, "");
        assert_eq!(product.name, "");
        assert_eq!(product.price, 0.0);
        assert!(!product.is_halal);
        assert_eq!(product.created_date, now());
        assert_eq!(product.expiration_date, now());
        assert_eq!(product.nutrition, Nutrition::default());
        assert!(product.product_image.is_none());
        assert!(product.alternative.is_none());
    }

    #[test]
    fn mistyped_fields_fall_back_to_defaults() {
        let product = document(json!({
            "$id": "doc-3",
            "name": 42,
            "price": "19.5",
            "fats": "lots",
            "isHalal": "yes",
            "expirationDate": "next week",
            "productImage": "not a url",
            "alternative": ""
        }))
        .normalize(now());

        assert_eq!(product.name, "");
        assert_eq!(product.price, 19.5);
        assert_eq!(product.nutrition.fats, 0.0);
        assert!(!product.is_halal);
        assert_eq!(product.expiration_date, now());
        assert!(product.product_image.is_none());
        assert!(product.alternative.is_none());
    }

    #[test]
    fn expanded_relationship_resolves_to_its_id() {
        let product = document(json!({
            "$id": "doc-1",
            "alternative": { "$id": "doc-7", "name": "Other" }
        }))
        .normalize(now());

        assert_eq!(product.alternative, Some(DocumentId::new("doc-7")));
    }

    #[test]
    fn parses_supported_date_shapes() {
        let expected = DateTime::parse_from_rfc3339("2025-05-06T07:08:09Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(parse_store_date("2025-05-06T07:08:09.000+00:00"), Some(expected));
        assert_eq!(parse_store_date("2025-05-06T09:08:09+02:00"), Some(expected));
        assert_eq!(parse_store_date("2025-05-06T07:08:09"), Some(expected));
        assert_eq!(parse_store_date("2025-05-06 07:08:09"), Some(expected));
        assert!(parse_store_date("2025-05-06").is_some());
        assert!(parse_store_date("06/05/2025").is_none());
    }
}
