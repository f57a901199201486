//! Purchase history types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecofinds_core::{Price, PurchaseId, UserId};

use super::cart::{self, CartLine};

/// A completed checkout: the cart as it stood at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    /// Signed-in user at checkout, if any.
    #[serde(default)]
    pub buyer_id: Option<UserId>,
    pub lines: Vec<CartLine>,
    /// Sum of the lines' snapshot prices times quantities.
    pub total: Price,
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    /// Record `lines` as a purchase made at `purchased_at`.
    #[must_use]
    pub fn from_cart(
        lines: Vec<CartLine>,
        buyer_id: Option<UserId>,
        purchased_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PurchaseId::generate(),
            buyer_id,
            total: cart::total(&lines),
            lines,
            purchased_at,
        }
    }

    /// Number of units bought.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        cart::item_count(&self.lines)
    }
}
