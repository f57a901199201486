//! Unified error handling.
//!
//! Provides the application-level `AppError` returned by [`AppState`](crate::state::AppState)
//! operations, and the short messages the view layer shows for each failure.

use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;
use crate::storage::StorageError;

const SAVE_FAILED: &str = "Could not save your changes, please try again";
const LOGIN_REQUIRED: &str = "Please log in first";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Identity operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog, cart, or purchase operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Storage could not be opened or cleared.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation needs a signed-in user.
    #[error("No active session")]
    NoActiveSession,
}

impl AppError {
    /// Whether this failure comes from the environment rather than the user's input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Auth(AuthError::Storage(_))
                | Self::Catalog(CatalogError::Storage(_))
        )
    }

    /// Short message suitable for showing to the user.
    ///
    /// Storage details are not exposed; they are logged instead.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => SAVE_FAILED.to_string(),
            Self::NoActiveSession => LOGIN_REQUIRED.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::DuplicateIdentity => "User already exists".to_string(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::EmptyUsername => "Username is required".to_string(),
                AuthError::EmptyPassword => "Password is required".to_string(),
                AuthError::Storage(_) => SAVE_FAILED.to_string(),
            },
            Self::Catalog(err) => match err {
                CatalogError::ProductNotFound(_) => "Product not found".to_string(),
                CatalogError::NotListingOwner => {
                    "You can only change your own listings".to_string()
                }
                CatalogError::OwnListing => "You cannot add your own product to cart".to_string(),
                CatalogError::NotInCart(_) => "That product is not in your cart".to_string(),
                CatalogError::EmptyCart => "Your cart is empty".to_string(),
                CatalogError::InvalidListing(reason) => format!("Invalid listing: {reason}"),
                CatalogError::Storage(_) => SAVE_FAILED.to_string(),
            },
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
