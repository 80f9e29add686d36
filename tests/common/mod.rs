//! Helpers for integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use arqr::domain::types::MediaUrl;
use arqr::models::document::StoreDocument;
use arqr::repository::{DocumentListQuery, ProductReader, RepositoryError, RepositoryResult};
use arqr::scanner::LinkOpener;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

/// In-memory products collection with an optional response delay.
#[derive(Default)]
pub struct FixtureStore {
    documents: Vec<StoreDocument>,
    delay: Option<Duration>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl FixtureStore {
    pub fn new(documents: Vec<Value>) -> Self {
        Self {
            documents: documents
                .into_iter()
                .map(|value| serde_json::from_value(value).expect("document fixture"))
                .collect(),
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductReader for FixtureStore {
    async fn list_products(
        &self,
        query: DocumentListQuery,
    ) -> RepositoryResult<(usize, Vec<StoreDocument>)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable {
            return Err(RepositoryError::Status {
                status: 503,
                message: "Service unavailable".into(),
            });
        }

        let page = match query.pagination {
            Some(p) => self
                .documents
                .iter()
                .skip(p.offset)
                .take(p.limit)
                .cloned()
                .collect(),
            None => self.documents.clone(),
        };
        Ok((self.documents.len(), page))
    }

    fn page_size(&self) -> usize {
        2
    }
}

/// Records opened links instead of launching a browser.
#[derive(Default)]
pub struct RecordingOpener {
    pub opened: RefCell<Vec<String>>,
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &MediaUrl) -> io::Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

pub fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// Five products: three dairy (one pointing at an alternative), one snack and
/// one drink whose alternative does not exist.
pub fn catalog() -> Vec<Value> {
    vec![
        json!({
            "$id": "doc-1",
            "productId": "PRD-1",
            "name": "Yogurt",
            "category": "Dairy",
            "price": 12500,
            "isHalal": true,
            "expirationDate": "2025-12-31T00:00:00.000+00:00",
            "createdDate": "2025-01-05T10:00:00.000+00:00",
            "carbohydrates": 4.5,
            "proteins": 3,
            "fats": 1,
            "totalKcal": 39,
            "certificateFile": "https://cdn.example.com/yogurt.pdf",
            "alternative": "doc-3"
        }),
        json!({
            "$id": "doc-2",
            "productId": "PRD-2",
            "name": "Kefir",
            "category": "Dairy",
            "price": 9000
        }),
        json!({
            "$id": "doc-3",
            "productId": "PRD-3",
            "name": "Ayran",
            "category": "Dairy",
            "price": 8000
        }),
        json!({
            "$id": "doc-4",
            "productId": "PRD-4",
            "name": "Chips",
            "category": "Snacks",
            "price": 15000
        }),
        json!({
            "$id": "doc-5",
            "productId": "PRD-5",
            "name": "Lemonade",
            "category": "Drinks",
            "price": 7000,
            "alternative": "doc-404"
        }),
    ]
}
