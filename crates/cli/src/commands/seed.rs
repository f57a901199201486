//! Seed the catalog with listings from a YAML file.
//!
//! # File format
//!
//! ```yaml
//! products:
//!   - id: lamp-01            # optional; generated when absent
//!     title: Desk Lamp
//!     description: Brass, works fine
//!     category: Home
//!     price: "12.50"
//!     image: https://example.com/lamp.jpg   # optional
//!     sellerId: seed-seller
//!     sellerName: EcoFinds
//! ```
//!
//! Entries whose `id` is already in the catalog are skipped, so seeding the
//! same file twice adds nothing the second time.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, info};

use ecofinds_core::{Category, Price, ProductId, UserId};
use ecofinds_storefront::models::Product;
use ecofinds_storefront::state::AppState;

use super::CliError;

/// Top-level shape of a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub products: Vec<SeedListing>,
}

/// One listing in a seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedListing {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
    pub seller_id: UserId,
    pub seller_name: String,
}

impl SeedListing {
    fn into_product(self, created_at: DateTime<Utc>) -> Product {
        Product {
            id: self.id.unwrap_or_else(ProductId::generate),
            title: self.title.trim().to_owned(),
            description: self.description,
            category: self.category,
            price: self.price,
            image: self.image,
            seller_id: self.seller_id,
            seller_name: self.seller_name,
            created_at,
        }
    }
}

/// Parse seed YAML.
///
/// # Errors
///
/// Returns `CliError::SeedFormat` if the YAML does not have the expected
/// shape, including negative prices and blank categories.
pub fn parse(content: &str) -> Result<SeedFile, CliError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Check entries for problems the types do not rule out.
///
/// Returns one message per problem.
#[must_use]
pub fn validate(seed: &SeedFile) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, listing) in seed.products.iter().enumerate() {
        if listing.title.trim().is_empty() {
            errors.push(format!("entry {index}: title cannot be blank"));
        }
        if listing.seller_id.as_str().trim().is_empty() {
            errors.push(format!("entry {index}: sellerId cannot be blank"));
        }
    }
    errors
}

/// Seed listings from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the catalog cannot be saved.
pub fn from_file(state: &mut AppState, path: &Path) -> Result<(), CliError> {
    info!(path = %path.display(), "Loading seed listings from file");

    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let seed = parse(&content)?;
    info!(listings = seed.products.len(), "Parsed seed file");

    let errors = validate(&seed);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CliError::SeedInvalid(errors.len()));
    }

    let total = seed.products.len();
    let now = state.clock().now();
    let products = seed
        .products
        .into_iter()
        .map(|listing| listing.into_product(now))
        .collect();
    let added = state.catalog_mut().seed(products)?;

    info!(added, skipped = total - added, "Applied seed file");
    Ok(())
}
