use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Everything the detail view needs after a successful scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductLookup {
    pub product: Product,
    /// Resolved target of `product.alternative`, if it exists.
    pub alternative: Option<Product>,
    /// Zero to two recommendations, never containing `product`.
    pub suggestions: Vec<Product>,
}

impl ProductLookup {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            alternative: None,
            suggestions: Vec::new(),
        }
    }
}
