//! Catalog browsing commands.

use ecofinds_core::{CategoryFilter, ProductId};
use ecofinds_storefront::services::catalog::CatalogError;
use ecofinds_storefront::state::AppState;

use super::{CliError, product_row};

/// List products passing the given search term and category.
#[allow(clippy::print_stdout)]
pub fn products(state: &mut AppState, search: Option<String>, category: Option<CategoryFilter>) {
    let catalog = state.catalog_mut();
    catalog.set_search_term(search.unwrap_or_default());
    catalog.set_category(category.unwrap_or_default());

    let matches = catalog.filtered_products();
    if matches.is_empty() {
        println!("No products found.");
        return;
    }
    for product in &matches {
        println!("{}", product_row(product));
    }
    println!("{} product(s)", matches.len());
}

#[allow(clippy::print_stdout)]
pub fn categories(state: &AppState) {
    for category in state.catalog().categories() {
        println!("{category}");
    }
}

/// Show one product in full.
///
/// # Errors
///
/// Returns `CatalogError::ProductNotFound` for an unknown ID.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState, id: &ProductId) -> Result<(), CliError> {
    let product = state
        .catalog()
        .product(id)
        .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;

    println!("{}", product.title);
    println!("  {} | {}", product.price, product.category);
    println!("  sold by {} on {}", product.seller_name, product.created_at.format("%Y-%m-%d"));
    if let Some(image) = &product.image {
        println!("  image: {image}");
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }

    let own = state
        .current_user()
        .is_some_and(|user| product.is_sold_by(&user.id));
    if own {
        println!();
        println!("This is your listing.");
    }
    Ok(())
}
