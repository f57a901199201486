//! EcoFinds Core - Shared types library.
//!
//! This crate provides common types used across all EcoFinds components:
//! - `storefront` - Session, catalog, and cart state persisted to a key-value store
//! - `cli` - Terminal front end driving the storefront state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, categories, and credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
