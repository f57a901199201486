//! Command implementations.
//!
//! Each command drives [`AppState`] and prints the result to stdout. Rules
//! live in the storefront crate; nothing here validates beyond parsing.

pub mod account;
pub mod browse;
pub mod cart;
pub mod listings;
pub mod seed;

use std::path::PathBuf;

use thiserror::Error;

use ecofinds_storefront::error::AppError;
use ecofinds_storefront::models::{CartLine, Product};
use ecofinds_storefront::services::catalog::CatalogError;
use ecofinds_storefront::state::AppState;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// A file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A seed file is not valid YAML for the expected shape.
    #[error("Invalid seed file: {0}")]
    SeedFormat(#[from] serde_yaml::Error),

    /// Seed entries failed validation.
    #[error("{0} seed validation error(s) found")]
    SeedInvalid(usize),

    /// `reset` was run without `--yes`.
    #[error("Refusing to delete data without --yes")]
    ResetNotConfirmed,
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::App(err.into())
    }
}

impl CliError {
    /// Message shown to the user on failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::App(err) => err.user_message(),
            other => other.to_string(),
        }
    }

    /// Whether the failure comes from the environment rather than the input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::App(err) => err.is_internal(),
            Self::Read { .. } => true,
            Self::SeedFormat(_) | Self::SeedInvalid(_) | Self::ResetNotConfirmed => false,
        }
    }
}

/// Delete all local data.
///
/// # Errors
///
/// Returns `CliError::ResetNotConfirmed` unless `confirmed`, or the storage error.
#[allow(clippy::print_stdout)]
pub fn reset(state: &mut AppState, confirmed: bool) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::ResetNotConfirmed);
    }
    state.reset()?;
    println!("All marketplace data deleted.");
    Ok(())
}

// =============================================================================
// Rendering
// =============================================================================

fn product_row(product: &Product) -> String {
    format!(
        "{}  {:<32}  {:>10}  {:<14}  by {}",
        product.id,
        product.title,
        product.price.display(),
        product.category.as_str(),
        product.seller_name
    )
}

fn cart_row(line: &CartLine) -> String {
    format!(
        "{}  {:<32}  {} x {:>3} = {:>10}",
        line.product_id,
        line.title,
        line.price.display(),
        line.quantity,
        line.line_total().display()
    )
}
