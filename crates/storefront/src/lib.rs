//! `EcoFinds` storefront library.
//!
//! The state and storage layer of a local second-hand marketplace: an account
//! registry with a signed-in session, a product catalog with search and
//! category filtering, a shopping cart, and purchase history. Every
//! collection is mirrored to a [`storage::KeyValueStore`] as it changes.
//!
//! [`state::AppState`] is the entry point; views drive it and render what it
//! returns.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;
