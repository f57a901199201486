//! Application state shared by every view.

use std::sync::Arc;

use tracing::info;

use ecofinds_core::ProductId;

use crate::clock::{Clock, SystemClock};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::models::{CartLine, ListingUpdate, NewListing, Product, ProfileUpdate, Purchase, User};
use crate::services::auth::SessionManager;
use crate::services::catalog::{CatalogError, CatalogManager};
use crate::storage::{FileStore, Storage};

/// Application state: one storage handle and the two managers built on it.
///
/// Constructed once per process. Operations that depend on who is signed in
/// (own-listing checks, listing authorship, purchase attribution) read the
/// session here and hand the user to the catalog.
#[derive(Debug)]
pub struct AppState {
    storage: Storage,
    clock: Arc<dyn Clock>,
    session: SessionManager,
    catalog: CatalogManager,
}

impl AppState {
    /// Rehydrate state from `storage` using the system clock.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Rehydrate state from `storage` with an explicit time source.
    #[must_use]
    pub fn with_clock(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        let session = SessionManager::load(storage.clone());
        let catalog = CatalogManager::load(storage.clone(), Arc::clone(&clock));

        Self {
            storage,
            clock,
            session,
            catalog,
        }
    }

    /// Open the file store under the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the data directory cannot be created.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let store = FileStore::open(&config.data_dir)?;
        info!(data_dir = %config.data_dir.display(), "Opened data directory");
        Ok(Self::new(Storage::new(store)))
    }

    /// Get a reference to the session manager.
    #[must_use]
    pub const fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Get a mutable reference to the session manager.
    pub const fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }

    /// The time source stamping listings and purchases.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Get a reference to the catalog manager.
    #[must_use]
    pub const fn catalog(&self) -> &CatalogManager {
        &self.catalog
    }

    /// Get a mutable reference to the catalog manager.
    pub const fn catalog_mut(&mut self) -> &mut CatalogManager {
        &mut self.catalog
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    /// The signed-in user, or `NoActiveSession`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoActiveSession` if nobody is signed in.
    pub fn require_user(&self) -> Result<&User> {
        self.session.current().ok_or(AppError::NoActiveSession)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::register`].
    pub fn register(&mut self, email: &str, password: &str, username: &str) -> Result<User> {
        Ok(self.session.register(email, password, username)?)
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::login`].
    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        Ok(self.session.login(email, password)?)
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::logout`].
    pub fn logout(&mut self) -> Result<()> {
        Ok(self.session.logout()?)
    }

    /// Edit the signed-in user's profile. `Ok(None)` when nobody is signed in.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::update_profile`].
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Option<User>> {
        Ok(self.session.update_profile(update)?)
    }

    // =========================================================================
    // Cart and checkout
    // =========================================================================

    /// Add one unit of a catalog product to the cart.
    ///
    /// Signed-in users cannot add their own listings.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` for an unknown ID, or any
    /// error from [`CatalogManager::add_to_cart`].
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<CartLine> {
        let product = self
            .catalog
            .product(id)
            .cloned()
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;
        let buyer = self.session.current().map(|user| &user.id);

        Ok(self.catalog.add_to_cart(&product, buyer)?)
    }

    /// Record the cart as a purchase by the signed-in user (if any).
    ///
    /// # Errors
    ///
    /// See [`CatalogManager::complete_purchase`].
    pub fn checkout(&mut self) -> Result<Purchase> {
        let buyer = self.session.current().map(|user| &user.id);
        Ok(self.catalog.complete_purchase(buyer)?)
    }

    /// The signed-in user's purchases, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoActiveSession` if nobody is signed in.
    pub fn my_purchases(&self) -> Result<Vec<&Purchase>> {
        let user = self.require_user()?;
        Ok(self.catalog.purchases_for(&user.id))
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Publish a listing as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoActiveSession` if nobody is signed in, or any
    /// error from [`CatalogManager::create_listing`].
    pub fn create_listing(&mut self, listing: NewListing) -> Result<Product> {
        let seller = self.session.current().ok_or(AppError::NoActiveSession)?;
        Ok(self.catalog.create_listing(seller, listing)?)
    }

    /// Edit one of the signed-in user's listings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoActiveSession` if nobody is signed in, or any
    /// error from [`CatalogManager::update_listing`].
    pub fn update_listing(&mut self, id: &ProductId, update: &ListingUpdate) -> Result<Product> {
        let seller = self.session.current().ok_or(AppError::NoActiveSession)?;
        Ok(self.catalog.update_listing(&seller.id, id, update)?)
    }

    /// Remove one of the signed-in user's listings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoActiveSession` if nobody is signed in, or any
    /// error from [`CatalogManager::delete_listing`].
    pub fn delete_listing(&mut self, id: &ProductId) -> Result<Product> {
        let seller = self.session.current().ok_or(AppError::NoActiveSession)?;
        Ok(self.catalog.delete_listing(&seller.id, id)?)
    }

    /// The signed-in user's listings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoActiveSession` if nobody is signed in.
    pub fn my_listings(&self) -> Result<Vec<&Product>> {
        let user = self.require_user()?;
        Ok(self.catalog.listings_by_seller(&user.id))
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Delete every persisted slot and start over with empty state.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if a slot cannot be removed.
    pub fn reset(&mut self) -> Result<()> {
        self.storage.clear_all()?;
        *self = Self::with_clock(self.storage.clone(), Arc::clone(&self.clock));
        info!("Reset all storefront data");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecofinds_core::{Category, Price};

    use super::*;
    use crate::clock::FixedClock;
    use crate::testing::product;

    fn state() -> AppState {
        AppState::with_clock(Storage::in_memory(), Arc::new(FixedClock::default()))
    }

    fn listing(title: &str) -> NewListing {
        NewListing {
            title: title.to_owned(),
            description: "Barely used".to_owned(),
            category: Category::parse("Outdoors").unwrap(),
            price: Price::from_cents(4500),
            image: None,
        }
    }

    #[test]
    fn test_listing_ops_require_session() {
        let mut state = state();
        assert!(matches!(
            state.create_listing(listing("Tent")),
            Err(AppError::NoActiveSession)
        ));
        assert!(matches!(state.my_listings(), Err(AppError::NoActiveSession)));
        assert!(matches!(state.my_purchases(), Err(AppError::NoActiveSession)));
    }

    #[test]
    fn test_seller_cannot_buy_own_listing() {
        let mut state = state();
        state.register("seller@x.com", "pw", "seller").unwrap();
        let tent = state.create_listing(listing("Tent")).unwrap();

        assert!(matches!(
            state.add_to_cart(&tent.id),
            Err(AppError::Catalog(CatalogError::OwnListing))
        ));

        state.logout().unwrap();
        state.register("buyer@x.com", "pw", "buyer").unwrap();
        let line = state.add_to_cart(&tent.id).unwrap();
        assert_eq!(line.seller_name, "seller");
    }

    #[test]
    fn test_add_unknown_product() {
        let mut state = state();
        assert!(matches!(
            state.add_to_cart(&ProductId::new("missing")),
            Err(AppError::Catalog(CatalogError::ProductNotFound(_)))
        ));
    }

    #[test]
    fn test_checkout_attributes_buyer() {
        let mut state = state();
        state
            .catalog_mut()
            .seed(vec![product("p1", "Kettle", "Home", 1500, "someone")])
            .unwrap();
        let buyer = state.register("buyer@x.com", "pw", "buyer").unwrap();

        state.add_to_cart(&ProductId::new("p1")).unwrap();
        let purchase = state.checkout().unwrap();

        assert_eq!(purchase.buyer_id.as_ref(), Some(&buyer.id));
        assert_eq!(state.my_purchases().unwrap().len(), 1);
        assert!(state.catalog().cart().is_empty());
    }

    #[test]
    fn test_only_owner_edits() {
        let mut state = state();
        state.register("a@x.com", "pw", "alice").unwrap();
        let tent = state.create_listing(listing("Tent")).unwrap();
        state.logout().unwrap();

        state.register("b@x.com", "pw", "bob").unwrap();
        assert!(matches!(
            state.delete_listing(&tent.id),
            Err(AppError::Catalog(CatalogError::NotListingOwner))
        ));

        state.login("a@x.com", "pw").unwrap();
        let renamed = state
            .update_listing(
                &tent.id,
                &ListingUpdate {
                    title: Some("Two-person tent".to_owned()),
                    ..ListingUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.title, "Two-person tent");
        assert_eq!(state.my_listings().unwrap().len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let storage = Storage::in_memory();
        let mut state = AppState::with_clock(storage.clone(), Arc::new(FixedClock::default()));
        state.register("a@x.com", "pw", "alice").unwrap();
        state.create_listing(listing("Tent")).unwrap();

        state.reset().unwrap();

        assert!(state.current_user().is_none());
        assert!(state.catalog().products().is_empty());
        let reopened = AppState::new(storage);
        assert!(reopened.session().users().is_empty());
    }
}
