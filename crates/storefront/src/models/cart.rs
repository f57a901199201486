//! Shopping cart types.

use serde::{Deserialize, Serialize};

use ecofinds_core::{Category, Price, ProductId, UserId};

use super::Product;

/// One aggregated cart entry: a product and how many of it.
///
/// The display fields and price are a snapshot taken when the product was
/// first added ("price-lock at add time"). Adding the same product again only
/// bumps `quantity`; later edits to the listing are not reflected here, and
/// totals are always computed from the snapshot price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    /// Always at least 1; a line that would reach 0 is removed instead.
    pub quantity: u32,
    pub price: Price,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: Category,
    pub seller_id: UserId,
    pub seller_name: String,
}

impl CartLine {
    /// New line with quantity 1 and a snapshot of `product`.
    #[must_use]
    pub fn snapshot(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            quantity: 1,
            price: product.price,
            title: product.title.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            seller_id: product.seller_id.clone(),
            seller_name: product.seller_name.clone(),
        }
    }

    /// Snapshot price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Sum of line totals.
#[must_use]
pub fn total(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// Sum of quantities.
///
/// Widened to `u64`; each line can hold up to `u32::MAX` units.
#[must_use]
pub fn item_count(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}
