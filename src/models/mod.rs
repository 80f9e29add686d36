//! Store-facing data shapes and configuration.

pub mod config;
pub mod document;
