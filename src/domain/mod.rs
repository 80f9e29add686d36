//! Domain entities and value objects for product lookup.

pub mod expiration;
pub mod lookup;
pub mod product;
pub mod types;
