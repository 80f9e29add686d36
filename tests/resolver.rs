use arqr::domain::types::ScanPayload;
use arqr::models::config::{ResolverOptions, SuggestionMode};
use arqr::services::ServiceError;
use arqr::services::resolver::ProductResolver;
use rand::SeedableRng;
use rand::rngs::StdRng;

mod common;

use common::{FixtureStore, catalog};

fn resolver(options: ResolverOptions) -> ProductResolver<FixtureStore, StdRng> {
    ProductResolver::new(
        FixtureStore::new(catalog()),
        StdRng::seed_from_u64(3),
        options,
    )
}

fn payload(value: &str) -> ScanPayload {
    ScanPayload::new(value).expect("non-empty payload")
}

#[tokio::test]
async fn snapshot_lookup_walks_every_page_once() {
    let mut resolver = resolver(ResolverOptions::default());

    let lookup = resolver.resolve(&payload("PRD-4")).await.expect("resolved");

    // Five documents in pages of two.
    assert_eq!(resolver.store().calls(), 3);
    assert_eq!(lookup.product.name, "Chips");
    assert!(lookup.alternative.is_none());
    // No other snacks: two products from other categories.
    assert_eq!(lookup.suggestions.len(), 2);
    assert!(lookup.suggestions.iter().all(|p| p.category != "Snacks"));
}

#[tokio::test]
async fn refetch_mode_lists_the_collection_again() {
    let mut resolver = resolver(ResolverOptions {
        alternatives: true,
        suggestions: SuggestionMode::Refetch,
    });

    let lookup = resolver.resolve(&payload("PRD-1")).await.expect("resolved");

    assert_eq!(resolver.store().calls(), 6);
    assert_eq!(lookup.alternative.map(|p| p.name), Some("Ayran".to_string()));
    assert_eq!(lookup.suggestions.len(), 2);
    assert!(lookup.suggestions.iter().all(|p| p.category == "Dairy"));
}

#[tokio::test]
async fn reduced_lookup_skips_alternative_and_suggestions() {
    let mut resolver = resolver(ResolverOptions::reduced());

    let lookup = resolver.resolve(&payload("PRD-1")).await.expect("resolved");

    assert_eq!(resolver.store().calls(), 3);
    assert!(lookup.alternative.is_none());
    assert!(lookup.suggestions.is_empty());
}

#[tokio::test]
async fn dangling_alternative_is_ignored() {
    let mut resolver = resolver(ResolverOptions::default());

    let lookup = resolver.resolve(&payload("PRD-5")).await.expect("resolved");

    assert!(lookup.alternative.is_none());
    assert_eq!(lookup.product.name, "Lemonade");
}

#[tokio::test]
async fn unavailable_store_maps_to_service_error() {
    let mut resolver = ProductResolver::new(
        FixtureStore::unavailable(),
        StdRng::seed_from_u64(3),
        ResolverOptions::default(),
    );

    let result = resolver.resolve(&payload("PRD-1")).await;

    assert_eq!(result.err(), Some(ServiceError::StoreUnavailable));
}
