//! Core library exports for the arqr product scanner.
//!
//! The `data` feature exposes the lookup layer: domain types, store document
//! models, the product reader abstraction and the resolver service. The
//! `scanner` feature adds the Appwrite client, the terminal session and the
//! Tera views used by the `arqr` binary.

pub mod domain;
mod error_conversions;
pub mod models;
pub mod repository;
#[cfg(feature = "scanner")]
pub mod scanner;
pub mod services;
#[cfg(feature = "scanner")]
pub mod views;
