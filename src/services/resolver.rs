use chrono::{DateTime, Utc};
use rand::Rng;

use crate::domain::lookup::ProductLookup;
use crate::domain::product::Product;
use crate::domain::types::ScanPayload;
use crate::models::config::{ResolverOptions, SuggestionMode};
use crate::models::document::StoreDocument;
use crate::repository::ProductReader;
use crate::services::suggestions::{SuggestionError, pick_suggestions};

use super::{ServiceError, ServiceResult};

/// Turns scanned payloads into product lookups.
///
/// Holds the store, the random source used for suggestions and the options
/// selecting which auxiliary results are computed.
pub struct ProductResolver<S, G> {
    store: S,
    rng: G,
    options: ResolverOptions,
}

impl<S, G> ProductResolver<S, G>
where
    S: ProductReader,
    G: Rng,
{
    pub fn new(store: S, rng: G, options: ResolverOptions) -> Self {
        Self {
            store,
            rng,
            options,
        }
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up the product addressed by `payload`.
    ///
    /// Fetches the whole collection and matches `productId` locally. Store
    /// failures map to [`ServiceError::StoreUnavailable`], a missing product
    /// to [`ServiceError::NotFound`]. Suggestion failures only empty the
    /// suggestion list.
    pub async fn resolve(&mut self, payload: &ScanPayload) -> ServiceResult<ProductLookup> {
        let documents = self.store.list_all_products().await.map_err(|e| {
            log::error!("Failed to list products: {e}");
            ServiceError::from(e)
        })?;

        let Some(document) = documents
            .iter()
            .find(|doc| payload.matches(&doc.product_code()))
        else {
            log::info!("Product with id '{payload}' not found");
            return Err(ServiceError::NotFound);
        };

        let now = Utc::now();
        let mut lookup = ProductLookup::new(document.normalize(now));

        if self.options.alternatives {
            lookup.alternative = resolve_alternative(&lookup.product, &documents, now);
        }

        lookup.suggestions = match self.suggestions(&lookup.product, &documents, now).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                log::warn!("Showing no suggestions for '{payload}': {e}");
                Vec::new()
            }
        };

        log::info!(
            "Resolved '{payload}' to '{}' (alternative: {}, suggestions: {})",
            lookup.product.id,
            lookup.alternative.is_some(),
            lookup.suggestions.len()
        );

        Ok(lookup)
    }

    async fn suggestions(
        &mut self,
        product: &Product,
        documents: &[StoreDocument],
        now: DateTime<Utc>,
    ) -> Result<Vec<Product>, SuggestionError> {
        let picked = match self.options.suggestions {
            SuggestionMode::Disabled => return Ok(Vec::new()),
            SuggestionMode::Snapshot => pick_suggestions(product, documents, &mut self.rng)
                .into_iter()
                .map(|doc| doc.normalize(now))
                .collect(),
            SuggestionMode::Refetch => {
                let fresh = self.store.list_all_products().await?;
                pick_suggestions(product, &fresh, &mut self.rng)
                    .into_iter()
                    .map(|doc| doc.normalize(now))
                    .collect()
            }
        };
        Ok(picked)
    }
}

/// Find the document referenced by `product.alternative` in `documents`.
///
/// A dangling reference is treated the same as no reference.
pub fn resolve_alternative(
    product: &Product,
    documents: &[StoreDocument],
    now: DateTime<Utc>,
) -> Option<Product> {
    let alternative_id = product.alternative.as_ref()?;
    let found = documents.iter().find(|doc| doc.id() == *alternative_id);
    if found.is_none() {
        log::debug!(
            "Alternative '{alternative_id}' of '{}' does not exist",
            product.id
        );
    }
    found.map(|doc| doc.normalize(now))
}
