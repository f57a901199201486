//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Account registry and the signed-in session
//! - `catalog` - Listings, browse filter, cart, and purchase history
//!
//! Both managers hold a clone of the same [`Storage`](crate::storage::Storage)
//! handle and own disjoint storage slots.

pub mod auth;
pub mod catalog;
