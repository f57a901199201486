//! Cart, checkout, and purchase history commands.

use ecofinds_core::ProductId;
use ecofinds_storefront::state::AppState;

use super::{CliError, cart_row};

#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    let catalog = state.catalog();
    if catalog.cart().is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in catalog.cart() {
        println!("{}", cart_row(line));
    }
    println!(
        "{} item(s), total {}",
        catalog.cart_item_count(),
        catalog.cart_total()
    );
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns the storefront error if the product is unknown or your own.
#[allow(clippy::print_stdout)]
pub fn add(state: &mut AppState, id: &ProductId) -> Result<(), CliError> {
    let line = state.add_to_cart(id)?;
    println!("Added \"{}\" (quantity {}).", line.title, line.quantity);
    Ok(())
}

/// Remove a product's whole line.
///
/// # Errors
///
/// Returns the storefront error if the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub fn remove(state: &mut AppState, id: &ProductId) -> Result<(), CliError> {
    match state.catalog_mut().remove_from_cart(id)? {
        Some(line) => println!("Removed \"{}\".", line.title),
        None => println!("That product is not in your cart."),
    }
    Ok(())
}

/// Set a line's quantity.
///
/// # Errors
///
/// Returns the storefront error if there is no such line or the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub fn set(state: &mut AppState, id: &ProductId, quantity: i64) -> Result<(), CliError> {
    match state.catalog_mut().set_quantity(id, quantity)? {
        Some(line) => println!("\"{}\" quantity set to {}.", line.title, line.quantity),
        None => println!("Removed from cart."),
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns the storefront error if the cart cannot be saved.
#[allow(clippy::print_stdout)]
pub fn clear(state: &mut AppState) -> Result<(), CliError> {
    state.catalog_mut().clear_cart()?;
    println!("Cart cleared.");
    Ok(())
}

/// Buy everything in the cart.
///
/// # Errors
///
/// Returns the storefront error if the cart is empty or cannot be saved.
#[allow(clippy::print_stdout)]
pub fn checkout(state: &mut AppState) -> Result<(), CliError> {
    let purchase = state.checkout()?;
    println!(
        "Purchase {} complete: {} item(s), total {}.",
        purchase.id,
        purchase.item_count(),
        purchase.total
    );
    Ok(())
}

/// Show the signed-in user's purchases, newest first.
///
/// # Errors
///
/// Returns the storefront error if nobody is signed in.
#[allow(clippy::print_stdout)]
pub fn purchases(state: &AppState) -> Result<(), CliError> {
    let history = state.my_purchases()?;
    if history.is_empty() {
        println!("No purchases yet.");
    }
    for purchase in history {
        println!(
            "{}  {}  {} item(s)  {}",
            purchase.purchased_at.format("%Y-%m-%d %H:%M"),
            purchase.id,
            purchase.item_count(),
            purchase.total
        );
        for line in &purchase.lines {
            println!("    {}", cart_row(line));
        }
    }
    Ok(())
}
