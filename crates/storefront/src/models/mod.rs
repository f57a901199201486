//! Domain models for the storefront.
//!
//! These are the shapes persisted in the key-value store; field names follow
//! the JSON layout of each storage slot.

pub mod cart;
pub mod product;
pub mod purchase;
pub mod user;

pub use cart::CartLine;
pub use product::{ListingUpdate, NewListing, Product};
pub use purchase::Purchase;
pub use user::{ProfileUpdate, RegisteredUser, User};
