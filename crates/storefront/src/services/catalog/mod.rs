//! Catalog, cart, and purchase management.
//!
//! [`CatalogManager`] owns the listings, the browse filter, the shopping
//! cart, and the purchase history. Every mutation is written to storage
//! first and committed in memory only once the write succeeds, so a storage
//! failure leaves the manager exactly as it was.

mod error;

pub use error::CatalogError;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use ecofinds_core::{Category, CategoryFilter, Price, ProductId, UserId};

use crate::clock::Clock;
use crate::models::{CartLine, ListingUpdate, NewListing, Product, Purchase, User, cart};
use crate::storage::{Storage, keys};

/// Owner of the catalog, cart, and purchase history.
pub struct CatalogManager {
    storage: Storage,
    clock: Arc<dyn Clock>,
    products: Vec<Product>,
    cart: Vec<CartLine>,
    purchases: Vec<Purchase>,
    search_term: String,
    category: CategoryFilter,
}

impl std::fmt::Debug for CatalogManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogManager")
            .field("products", &self.products.len())
            .field("cart_lines", &self.cart.len())
            .field("purchases", &self.purchases.len())
            .field("search_term", &self.search_term)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl CatalogManager {
    /// Rehydrate catalog, cart, and history from storage.
    ///
    /// Malformed slots are discarded, and persisted cart lines with a zero
    /// quantity are dropped.
    #[instrument(skip_all)]
    pub fn load(storage: Storage, clock: Arc<dyn Clock>) -> Self {
        let products: Vec<Product> = storage.load_or_default(keys::PRODUCTS_CATALOG);
        let mut cart: Vec<CartLine> = storage.load_or_default(keys::CART_LINES);
        let purchases: Vec<Purchase> = storage.load_or_default(keys::PURCHASE_HISTORY);

        let persisted_lines = cart.len();
        cart.retain(|line| line.quantity > 0);
        if cart.len() < persisted_lines {
            warn!(
                dropped = persisted_lines - cart.len(),
                "Dropped cart lines with zero quantity"
            );
        }

        debug!(
            products = products.len(),
            cart_lines = cart.len(),
            purchases = purchases.len(),
            "Loaded catalog state"
        );

        Self {
            storage,
            clock,
            products,
            cart,
            purchases,
            search_term: String::new(),
            category: CategoryFilter::All,
        }
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    /// All listings, in the order they were added.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a listing by ID.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Listings by one seller, in catalog order.
    #[must_use]
    pub fn listings_by_seller(&self, seller: &UserId) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.is_sold_by(seller))
            .collect()
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    #[must_use]
    pub const fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    /// Listings passing the current category filter and search term.
    ///
    /// Recomputed on every call; catalog order is preserved.
    #[must_use]
    pub fn filtered_products(&self) -> Vec<&Product> {
        let needle = self.search_term.to_lowercase();
        self.products
            .iter()
            .filter(|product| self.category.admits(&product.category))
            .filter(|product| product.matches_search(&needle))
            .collect()
    }

    /// `All`, then every category present in the catalog, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryFilter> {
        let present: BTreeSet<&Category> = self
            .products
            .iter()
            .map(|product| &product.category)
            .collect();

        std::iter::once(CategoryFilter::All)
            .chain(present.into_iter().cloned().map(CategoryFilter::Only))
            .collect()
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Publish a new listing sold by `seller`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidListing` if the title is blank.
    /// Returns `CatalogError::Storage` if the catalog cannot be persisted.
    #[instrument(skip(self, seller, listing), fields(seller_id = %seller.id))]
    pub fn create_listing(
        &mut self,
        seller: &User,
        listing: NewListing,
    ) -> Result<Product, CatalogError> {
        let title = validate_title(&listing.title)?;

        let product = Product {
            id: ProductId::generate(),
            title,
            description: listing.description.trim().to_owned(),
            category: listing.category,
            price: listing.price,
            image: listing.image.filter(|image| !image.trim().is_empty()),
            seller_id: seller.id.clone(),
            seller_name: seller.display_name().to_owned(),
            created_at: self.clock.now(),
        };

        let mut products = self.products.clone();
        products.push(product.clone());
        self.commit_products(products)?;

        info!(product_id = %product.id, "Created listing");
        Ok(product)
    }

    /// Edit a listing. Only its seller may do so.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` / `CatalogError::NotListingOwner`.
    /// Returns `CatalogError::InvalidListing` if the new title is blank.
    /// Returns `CatalogError::Storage` if the catalog cannot be persisted.
    #[instrument(skip(self, update))]
    pub fn update_listing(
        &mut self,
        seller: &UserId,
        id: &ProductId,
        update: &ListingUpdate,
    ) -> Result<Product, CatalogError> {
        self.owned_listing(seller, id)?;
        let mut update = update.clone();
        if let Some(title) = &update.title {
            update.title = Some(validate_title(title)?);
        }

        let mut products = self.products.clone();
        let product = products
            .iter_mut()
            .find(|product| &product.id == id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;
        update.apply(product);
        let updated = product.clone();

        self.commit_products(products)?;
        info!("Updated listing");
        Ok(updated)
    }

    /// Remove a listing. Only its seller may do so.
    ///
    /// Cart lines and purchases referencing it keep their snapshots.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` / `CatalogError::NotListingOwner`.
    /// Returns `CatalogError::Storage` if the catalog cannot be persisted.
    #[instrument(skip(self))]
    pub fn delete_listing(
        &mut self,
        seller: &UserId,
        id: &ProductId,
    ) -> Result<Product, CatalogError> {
        let removed = self.owned_listing(seller, id)?.clone();

        let products = self
            .products
            .iter()
            .filter(|product| &product.id != id)
            .cloned()
            .collect();
        self.commit_products(products)?;

        info!("Deleted listing");
        Ok(removed)
    }

    /// Append listings whose IDs are not yet in the catalog.
    ///
    /// Returns how many were added.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog cannot be persisted.
    pub fn seed(&mut self, seeds: Vec<Product>) -> Result<usize, CatalogError> {
        let mut seen: HashSet<ProductId> =
            self.products.iter().map(|product| product.id.clone()).collect();
        let fresh: Vec<Product> = seeds
            .into_iter()
            .filter(|product| seen.insert(product.id.clone()))
            .collect();

        if fresh.is_empty() {
            return Ok(0);
        }

        let added = fresh.len();
        let mut products = self.products.clone();
        products.extend(fresh);
        self.commit_products(products)?;

        info!(added, "Seeded catalog");
        Ok(added)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Current cart lines, in the order first added.
    #[must_use]
    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    /// Sum of snapshot price times quantity over the cart.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        cart::total(&self.cart)
    }

    /// Total units in the cart.
    #[must_use]
    pub fn cart_item_count(&self) -> u64 {
        cart::item_count(&self.cart)
    }

    /// Add one unit of `product` to the cart.
    ///
    /// A product already in the cart only gets its quantity bumped; its
    /// snapshot (price, title, image) stays as it was at the first add.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::OwnListing` if `buyer` is the product's seller.
    /// Returns `CatalogError::Storage` if the cart cannot be persisted.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        buyer: Option<&UserId>,
    ) -> Result<CartLine, CatalogError> {
        if buyer.is_some_and(|buyer| product.is_sold_by(buyer)) {
            return Err(CatalogError::OwnListing);
        }

        let mut lines = self.cart.clone();
        let line = if let Some(line) = lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
            line.clone()
        } else {
            let line = CartLine::snapshot(product);
            lines.push(line.clone());
            line
        };

        self.commit_cart(lines)?;
        debug!(quantity = line.quantity, "Added to cart");
        Ok(line)
    }

    /// Remove a product's whole line, whatever its quantity.
    ///
    /// Returns the removed line, or `None` if the product was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the cart cannot be persisted.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> Result<Option<CartLine>, CatalogError> {
        let Some(position) = self.cart.iter().position(|line| &line.product_id == id) else {
            return Ok(None);
        };

        let mut lines = self.cart.clone();
        let removed = lines.remove(position);
        self.commit_cart(lines)?;

        debug!(product_id = %id, "Removed from cart");
        Ok(Some(removed))
    }

    /// Set a line's quantity. Zero or below removes the line.
    ///
    /// Returns the updated line, or `None` if it was removed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotInCart` if `quantity > 0` and there is no line.
    /// Returns `CatalogError::Storage` if the cart cannot be persisted.
    pub fn set_quantity(
        &mut self,
        id: &ProductId,
        quantity: i64,
    ) -> Result<Option<CartLine>, CatalogError> {
        if quantity <= 0 {
            return self.remove_from_cart(id).map(|_| None);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let mut lines = self.cart.clone();
        let line = lines
            .iter_mut()
            .find(|line| &line.product_id == id)
            .ok_or_else(|| CatalogError::NotInCart(id.clone()))?;
        line.quantity = quantity;
        let updated = line.clone();

        self.commit_cart(lines)?;
        debug!(product_id = %id, quantity, "Set cart quantity");
        Ok(Some(updated))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<(), CatalogError> {
        self.commit_cart(Vec::new())?;
        debug!("Cleared cart");
        Ok(())
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Every recorded purchase, oldest first.
    #[must_use]
    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// One buyer's purchases, newest first.
    #[must_use]
    pub fn purchases_for(&self, buyer: &UserId) -> Vec<&Purchase> {
        self.purchases
            .iter()
            .rev()
            .filter(|purchase| purchase.buyer_id.as_ref() == Some(buyer))
            .collect()
    }

    /// Record the cart as a purchase, then empty it.
    ///
    /// Both steps succeed or neither is visible: if the history cannot be
    /// written the cart is untouched, and if the cart cannot be cleared the
    /// history write is rolled back.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyCart` if there is nothing to buy.
    /// Returns `CatalogError::Storage` if either write fails.
    #[instrument(skip(self))]
    pub fn complete_purchase(&mut self, buyer: Option<&UserId>) -> Result<Purchase, CatalogError> {
        if self.cart.is_empty() {
            return Err(CatalogError::EmptyCart);
        }

        let purchase = Purchase::from_cart(self.cart.clone(), buyer.cloned(), self.clock.now());
        let mut history = self.purchases.clone();
        history.push(purchase.clone());

        self.storage.save(keys::PURCHASE_HISTORY, &history)?;
        if let Err(e) = self.storage.save(keys::CART_LINES, &[] as &[CartLine]) {
            self.restore(keys::PURCHASE_HISTORY, &self.purchases);
            return Err(e.into());
        }

        self.purchases = history;
        self.cart.clear();

        info!(
            purchase_id = %purchase.id,
            total = %purchase.total,
            items = purchase.item_count(),
            "Completed purchase"
        );
        Ok(purchase)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn owned_listing(&self, seller: &UserId, id: &ProductId) -> Result<&Product, CatalogError> {
        let product = self
            .product(id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;
        if !product.is_sold_by(seller) {
            warn!(
                product_id = %id,
                user_id = %seller,
                "Rejected change to another seller's listing"
            );
            return Err(CatalogError::NotListingOwner);
        }
        Ok(product)
    }

    fn commit_products(&mut self, products: Vec<Product>) -> Result<(), CatalogError> {
        self.storage.save(keys::PRODUCTS_CATALOG, &products)?;
        self.products = products;
        Ok(())
    }

    fn commit_cart(&mut self, lines: Vec<CartLine>) -> Result<(), CatalogError> {
        self.storage.save(keys::CART_LINES, &lines)?;
        self.cart = lines;
        Ok(())
    }

    fn restore<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.storage.save(key, value) {
            error!(key, error = %e, "Failed to roll back persisted state");
        }
    }
}

fn validate_title(title: &str) -> Result<String, CatalogError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidListing(
            "title cannot be blank".to_owned(),
        ));
    }
    Ok(trimmed.to_owned())
}
