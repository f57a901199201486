//! Catalog and cart error types.

use thiserror::Error;

use ecofinds_core::ProductId;

use crate::storage::StorageError;

/// Errors that can occur during catalog, cart, and purchase operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No listing has this ID.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Only the seller may edit or remove a listing.
    #[error("only the seller can change this listing")]
    NotListingOwner,

    /// Sellers cannot put their own listing in their cart.
    #[error("cannot add your own product to the cart")]
    OwnListing,

    /// The cart has no line for this product.
    #[error("product not in cart: {0}")]
    NotInCart(ProductId),

    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Listing fields failed validation.
    #[error("invalid listing: {0}")]
    InvalidListing(String),

    /// Persisting catalog state failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
