//! Core types for EcoFinds.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod credential;
pub mod email;
pub mod id;
pub mod price;

pub use category::{ALL_CATEGORIES, Category, CategoryError, CategoryFilter};
pub use credential::Password;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
