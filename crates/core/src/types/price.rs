//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are non-negative amounts in the marketplace's single display
//! currency. Arithmetic stays in [`Decimal`] so cart totals never pick up
//! floating point drift.

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount is above [`Price::MAX`].
    #[error("price cannot exceed {max} (got {0})", max = Price::MAX.amount())]
    TooLarge(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative price, at most [`Price::MAX`].
///
/// Serialized as a decimal string (e.g. `"12.50"`) so no precision is lost
/// in persisted state. Products of a price and a quantity, and sums of
/// prices, saturate at [`Decimal::MAX`] instead of overflowing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted price: 1,000,000,000.
    pub const MAX: Self = Self(Decimal::from_parts(1_000_000_000, 0, 0, false, 0));

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero, or
    /// `PriceError::TooLarge` if it is above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('$');
        let amount: Decimal = trimmed
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.0)))
    }
}
