//! Listing management commands.

use clap::Args;

use ecofinds_core::{Category, Price, ProductId};
use ecofinds_storefront::models::{ListingUpdate, NewListing};
use ecofinds_storefront::state::AppState;

use super::{CliError, product_row};

/// Listing fields to change. Omitted flags are left as they are.
#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: ProductId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long)]
    pub price: Option<Price>,
    #[arg(long)]
    pub image: Option<String>,
}

/// Publish a listing as the signed-in user.
///
/// # Errors
///
/// Returns the storefront error if nobody is signed in or the listing is invalid.
#[allow(clippy::print_stdout)]
pub fn sell(
    state: &mut AppState,
    title: String,
    description: String,
    category: Category,
    price: Price,
    image: Option<String>,
) -> Result<(), CliError> {
    let product = state.create_listing(NewListing {
        title,
        description,
        category,
        price,
        image,
    })?;
    println!("Listed:");
    println!("{}", product_row(&product));
    Ok(())
}

/// Edit one of the signed-in user's listings.
///
/// # Errors
///
/// Returns the storefront error if the listing is missing or not yours.
#[allow(clippy::print_stdout)]
pub fn edit(state: &mut AppState, args: EditArgs) -> Result<(), CliError> {
    let update = ListingUpdate {
        title: args.title,
        description: args.description,
        category: args.category,
        price: args.price,
        image: args.image,
    };
    let product = state.update_listing(&args.id, &update)?;
    println!("Updated:");
    println!("{}", product_row(&product));
    Ok(())
}

/// Remove one of the signed-in user's listings.
///
/// # Errors
///
/// Returns the storefront error if the listing is missing or not yours.
#[allow(clippy::print_stdout)]
pub fn delist(state: &mut AppState, id: &ProductId) -> Result<(), CliError> {
    let product = state.delete_listing(id)?;
    println!("Removed \"{}\".", product.title);
    Ok(())
}

/// List the signed-in user's listings.
///
/// # Errors
///
/// Returns the storefront error if nobody is signed in.
#[allow(clippy::print_stdout)]
pub fn mine(state: &AppState) -> Result<(), CliError> {
    let listings = state.my_listings()?;
    if listings.is_empty() {
        println!("You have no listings.");
    }
    for product in listings {
        println!("{}", product_row(product));
    }
    Ok(())
}
