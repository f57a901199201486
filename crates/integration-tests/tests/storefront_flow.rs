//! End-to-end marketplace scenarios over a file-backed data directory.

#![allow(clippy::unwrap_used)]

use ecofinds_core::{Category, CategoryFilter, Price, ProductId};
use ecofinds_integration_tests::TestContext;
use ecofinds_storefront::error::AppError;
use ecofinds_storefront::models::{ListingUpdate, NewListing, ProfileUpdate};
use ecofinds_storefront::services::auth::AuthError;
use ecofinds_storefront::services::catalog::CatalogError;
use ecofinds_storefront::state::AppState;

fn listing(title: &str, description: &str, category: &str, cents: u32) -> NewListing {
    NewListing {
        title: title.to_owned(),
        description: description.to_owned(),
        category: Category::parse(category).unwrap(),
        price: Price::from_cents(cents),
        image: None,
    }
}

/// Seller account with a small mixed catalog, then signed out.
fn stocked(ctx: &TestContext) -> AppState {
    let mut state = ctx.start();
    state.register("seller@x.com", "pw", "seller").unwrap();
    for (title, description, category, cents) in [
        ("Coffee Mug", "Stoneware", "Home", 800),
        ("Desk Lamp", "Brass, adjustable", "Home", 1800),
        ("Mug Warmer", "USB powered", "Electronics", 799),
        ("Headphones", "Comes with a travel MUG", "Electronics", 3500),
        ("Paperback", "Mystery novel", "Books", 300),
    ] {
        state
            .create_listing(listing(title, description, category, cents))
            .unwrap();
    }
    state.logout().unwrap();
    state
}

fn titles(state: &AppState) -> Vec<String> {
    state
        .catalog()
        .filtered_products()
        .iter()
        .map(|product| product.title.clone())
        .collect()
}

fn id_of(state: &AppState, title: &str) -> ProductId {
    state
        .catalog()
        .products()
        .iter()
        .find(|product| product.title == title)
        .unwrap()
        .id
        .clone()
}

#[test]
fn test_register_logout_login_restores_same_user() {
    let ctx = TestContext::new();
    let mut state = ctx.start();

    let registered = state.register("a@x.com", "pw", "alice").unwrap();
    state.logout().unwrap();
    assert!(state.current_user().is_none());

    assert!(matches!(
        state.login("a@x.com", "wrong"),
        Err(AppError::Auth(AuthError::InvalidCredentials))
    ));

    let signed_in = state.login("a@x.com", "pw").unwrap();
    assert_eq!(signed_in.id, registered.id);
}

#[test]
fn test_duplicate_identities_rejected() {
    let ctx = TestContext::new();
    let mut state = ctx.start();

    state.register("a@x.com", "pw", "alice").unwrap();
    assert!(matches!(
        state.register("a@x.com", "pw2", "alice2"),
        Err(AppError::Auth(AuthError::DuplicateIdentity))
    ));
    assert!(matches!(
        state.register("b@x.com", "pw2", "alice"),
        Err(AppError::Auth(AuthError::DuplicateIdentity))
    ));
    state.register("b@x.com", "pw2", "bob").unwrap();

    assert_eq!(state.session().users().len(), 2);
}

#[test]
fn test_login_is_exact_match() {
    let ctx = TestContext::new();
    let mut state = ctx.start();
    state.register("a@x.com", "Secret", "alice").unwrap();
    state.logout().unwrap();

    assert!(state.login("A@x.com", "Secret").is_err());
    assert!(state.login("a@x.com", "secret").is_err());
    assert!(state.login("a@x.com", "Secret").is_ok());
}

#[test]
fn test_profile_name_change_survives_restart() {
    let ctx = TestContext::new();
    let mut state = ctx.start();
    let before = state.register("a@x.com", "pw", "alice").unwrap();

    let unchanged = state.update_profile(&ProfileUpdate::default()).unwrap().unwrap();
    assert_eq!(unchanged, before);

    state
        .update_profile(&ProfileUpdate {
            name: Some("X".to_owned()),
            ..ProfileUpdate::default()
        })
        .unwrap();
    drop(state);

    let restarted = ctx.start();
    let session = restarted.current_user().unwrap();
    assert_eq!(session.name, "X");
    assert_eq!(session.email, before.email);
    assert_eq!(session.username, before.username);

    let entry = restarted.session().find_user(&before.id).unwrap();
    assert_eq!(entry.name, "X");
    assert_eq!(entry.phone, before.phone);
}

#[test]
fn test_browse_filters() {
    let ctx = TestContext::new();
    let mut state = stocked(&ctx);

    state.catalog_mut().set_search_term("mug");
    state.catalog_mut().set_category(CategoryFilter::All);
    assert_eq!(titles(&state), ["Coffee Mug", "Mug Warmer", "Headphones"]);

    state
        .catalog_mut()
        .set_category("Electronics".parse().unwrap());
    assert_eq!(titles(&state), ["Mug Warmer", "Headphones"]);

    state.catalog_mut().set_search_term("");
    state.catalog_mut().set_category("Books".parse().unwrap());
    assert_eq!(titles(&state), ["Paperback"]);

    let labels: Vec<String> = state
        .catalog()
        .categories()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(labels, ["All", "Books", "Electronics", "Home"]);
}

#[test]
fn test_cart_merges_and_locks_price() {
    let ctx = TestContext::new();
    let mut state = stocked(&ctx);
    let lamp = id_of(&state, "Desk Lamp");

    state.register("buyer@x.com", "pw", "buyer").unwrap();
    state.add_to_cart(&lamp).unwrap();

    // The seller reprices between the buyer's two adds.
    state.logout().unwrap();
    state.login("seller@x.com", "pw").unwrap();
    state
        .update_listing(
            &lamp,
            &ListingUpdate {
                price: Some(Price::from_cents(9900)),
                ..ListingUpdate::default()
            },
        )
        .unwrap();
    state.logout().unwrap();
    state.login("buyer@x.com", "pw").unwrap();

    let line = state.add_to_cart(&lamp).unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.price, Price::from_cents(1800));
    assert_eq!(state.catalog().cart().len(), 1);
    assert_eq!(state.catalog().cart_total(), Price::from_cents(3600));

    let removed = state.catalog_mut().remove_from_cart(&lamp).unwrap();
    assert_eq!(removed.unwrap().quantity, 2);
    assert!(state.catalog().cart().is_empty());
}

#[test]
fn test_checkout_records_history_and_empties_cart() {
    let ctx = TestContext::new();
    let mut state = ctx.start();
    state.register("seller@x.com", "pw", "seller").unwrap();
    let ten = state.create_listing(listing("Ten", "", "Misc", 1000)).unwrap();
    let five = state.create_listing(listing("Five", "", "Misc", 500)).unwrap();
    state.logout().unwrap();

    let buyer = state.register("buyer@x.com", "pw", "buyer").unwrap();
    state.add_to_cart(&ten.id).unwrap();
    state.add_to_cart(&ten.id).unwrap();
    state.add_to_cart(&five.id).unwrap();
    assert_eq!(state.catalog().cart_item_count(), 3);

    let purchase = state.checkout().unwrap();
    assert_eq!(purchase.total, Price::from_cents(2500));
    assert_eq!(purchase.buyer_id.as_ref(), Some(&buyer.id));
    assert!(state.catalog().cart().is_empty());

    assert!(matches!(
        state.checkout(),
        Err(AppError::Catalog(CatalogError::EmptyCart))
    ));
    drop(state);

    let restarted = ctx.start();
    let history = restarted.my_purchases().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].total, Price::from_cents(2500));
    assert!(restarted.catalog().cart().is_empty());
}

#[test]
fn test_purchase_history_newest_first() {
    let ctx = TestContext::new();
    let mut state = stocked(&ctx);
    let mug = id_of(&state, "Coffee Mug");
    let lamp = id_of(&state, "Desk Lamp");
    state.register("buyer@x.com", "pw", "buyer").unwrap();

    state.add_to_cart(&mug).unwrap();
    state.checkout().unwrap();
    ctx.clock().advance(86_400);
    state.add_to_cart(&lamp).unwrap();
    state.checkout().unwrap();

    let history = state.my_purchases().unwrap();
    assert_eq!(history[0].lines[0].title, "Desk Lamp");
    assert_eq!(history[1].lines[0].title, "Coffee Mug");
}

#[test]
fn test_set_quantity_and_clear() {
    let ctx = TestContext::new();
    let mut state = stocked(&ctx);
    let mug = id_of(&state, "Coffee Mug");
    let lamp = id_of(&state, "Desk Lamp");

    state.add_to_cart(&mug).unwrap();
    state.add_to_cart(&lamp).unwrap();
    state.catalog_mut().set_quantity(&mug, 4).unwrap();
    assert_eq!(state.catalog().cart_item_count(), 5);

    state.catalog_mut().set_quantity(&mug, 0).unwrap();
    assert_eq!(state.catalog().cart().len(), 1);

    state.catalog_mut().clear_cart().unwrap();
    assert!(state.catalog().cart().is_empty());
}

#[test]
fn test_listing_ownership() {
    let ctx = TestContext::new();
    let mut state = stocked(&ctx);
    let lamp = id_of(&state, "Desk Lamp");

    state.register("other@x.com", "pw", "other").unwrap();
    assert!(matches!(
        state.delete_listing(&lamp),
        Err(AppError::Catalog(CatalogError::NotListingOwner))
    ));
    state.logout().unwrap();

    state.login("seller@x.com", "pw").unwrap();
    assert!(matches!(
        state.add_to_cart(&lamp),
        Err(AppError::Catalog(CatalogError::OwnListing))
    ));
    assert_eq!(state.my_listings().unwrap().len(), 5);
    state.delete_listing(&lamp).unwrap();
    assert_eq!(state.my_listings().unwrap().len(), 4);
}
