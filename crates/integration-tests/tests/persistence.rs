//! On-disk layout and rehydration of the file-backed store.

#![allow(clippy::unwrap_used)]

use ecofinds_core::{Category, Price};
use ecofinds_integration_tests::TestContext;
use ecofinds_storefront::models::NewListing;
use ecofinds_storefront::storage::keys;
use serde_json::Value;

fn sell_and_add(ctx: &TestContext) {
    let mut state = ctx.start();
    state.register("seller@x.com", "pw", "seller").unwrap();
    let kettle = state
        .create_listing(NewListing {
            title: "Kettle".to_owned(),
            description: "Stainless".to_owned(),
            category: Category::parse("Home").unwrap(),
            price: Price::from_cents(1500),
            image: None,
        })
        .unwrap();
    state.logout().unwrap();
    state.register("buyer@x.com", "pw", "buyer").unwrap();
    state.add_to_cart(&kettle.id).unwrap();
}

#[test]
fn test_one_json_file_per_slot() {
    let ctx = TestContext::new();
    sell_and_add(&ctx);

    for key in [
        keys::USERS_REGISTRY,
        keys::CURRENT_SESSION,
        keys::PRODUCTS_CATALOG,
        keys::CART_LINES,
    ] {
        let raw = ctx.read_slot(key).unwrap();
        serde_json::from_str::<Value>(&raw).unwrap();
    }
    assert!(ctx.read_slot(keys::PURCHASE_HISTORY).is_none());
}

#[test]
fn test_session_never_stores_password() {
    let ctx = TestContext::new();
    sell_and_add(&ctx);

    let session: Value =
        serde_json::from_str(&ctx.read_slot(keys::CURRENT_SESSION).unwrap()).unwrap();
    assert_eq!(session["username"], "buyer");
    assert!(session.get("password").is_none());

    let registry: Value =
        serde_json::from_str(&ctx.read_slot(keys::USERS_REGISTRY).unwrap()).unwrap();
    assert_eq!(registry.as_array().unwrap().len(), 2);
    assert_eq!(registry[1]["password"], "pw");
}

#[test]
fn test_wire_field_names() {
    let ctx = TestContext::new();
    sell_and_add(&ctx);

    let catalog: Value =
        serde_json::from_str(&ctx.read_slot(keys::PRODUCTS_CATALOG).unwrap()).unwrap();
    let product = &catalog[0];
    assert_eq!(product["sellerName"], "seller");
    assert!(product.get("sellerId").is_some());
    assert!(product.get("createdAt").is_some());

    let cart: Value = serde_json::from_str(&ctx.read_slot(keys::CART_LINES).unwrap()).unwrap();
    assert_eq!(cart[0]["productId"], product["id"]);
    assert_eq!(cart[0]["quantity"], 1);
}

#[test]
fn test_restart_rehydrates_everything() {
    let ctx = TestContext::new();
    sell_and_add(&ctx);

    let state = ctx.start();
    assert_eq!(state.current_user().unwrap().username, "buyer");
    assert_eq!(state.session().users().len(), 2);
    assert_eq!(state.catalog().products().len(), 1);
    assert_eq!(state.catalog().cart_total(), Price::from_cents(1500));
}

#[test]
fn test_logout_removes_session_file() {
    let ctx = TestContext::new();
    sell_and_add(&ctx);

    let mut state = ctx.start();
    state.logout().unwrap();
    assert!(ctx.read_slot(keys::CURRENT_SESSION).is_none());
    state.logout().unwrap();

    assert!(ctx.start().current_user().is_none());
}

#[test]
fn test_corrupt_slots_degrade_to_empty() {
    let ctx = TestContext::new();
    sell_and_add(&ctx);
    ctx.write_slot(keys::CURRENT_SESSION, "{\"id\": 42");
    ctx.write_slot(keys::CART_LINES, "not json at all");

    let state = ctx.start();
    assert!(state.current_user().is_none());
    assert!(state.catalog().cart().is_empty());
    // Untouched slots still load.
    assert_eq!(state.session().users().len(), 2);
    assert_eq!(state.catalog().products().len(), 1);
}

#[test]
fn test_reset_deletes_slot_files() {
    let ctx = TestContext::new();
    sell_and_add(&ctx);

    let mut state = ctx.start();
    state.reset().unwrap();

    for key in keys::ALL {
        assert!(ctx.read_slot(key).is_none(), "{key} should be gone");
    }
    assert!(state.catalog().products().is_empty());
}
