use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::domain::product::Product;
use crate::models::document::StoreDocument;
use crate::repository::RepositoryError;

/// Upper bound on the number of suggested products.
pub const MAX_SUGGESTIONS: usize = 2;

/// Reasons suggestions could not be computed. Never fatal to a lookup.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("failed to load suggestion candidates: {0}")]
    Store(#[from] RepositoryError),
}

/// Choose up to [`MAX_SUGGESTIONS`] documents to recommend next to `scanned`.
///
/// Documents sharing the scanned product's `productId` are never picked.
/// Same-category products are preferred: two of them when available, the
/// single one plus a random product from another category, or two random
/// products from other categories when none share the category.
pub fn pick_suggestions<'a, R>(
    scanned: &Product,
    documents: &'a [StoreDocument],
    rng: &mut R,
) -> Vec<&'a StoreDocument>
where
    R: Rng + ?Sized,
{
    let (same_category, other_category): (Vec<&StoreDocument>, Vec<&StoreDocument>) = documents
        .iter()
        .filter(|doc| doc.product_code() != scanned.product_id)
        .partition(|doc| doc.category() == scanned.category);

    match same_category.len() {
        0 => other_category
            .choose_multiple(rng, MAX_SUGGESTIONS)
            .copied()
            .collect(),
        1 => {
            let mut picked = same_category;
            picked.extend(other_category.choose(rng).copied());
            picked
        }
        _ => same_category
            .choose_multiple(rng, MAX_SUGGESTIONS)
            .copied()
            .collect(),
    }
}
