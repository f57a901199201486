//! Listing categories and the browse filter built on them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Label of the catch-all filter entry.
pub const ALL_CATEGORIES: &str = "All";

/// Errors that can occur when parsing a [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// The label is empty or only whitespace.
    #[error("category cannot be blank")]
    Blank,
    /// The label collides with the catch-all filter.
    #[error("\"{ALL_CATEGORIES}\" is reserved and cannot be used as a category")]
    Reserved,
}

/// A product category label, e.g. `Electronics`.
///
/// Matching is exact: `Electronics` and `electronics` are distinct categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Parse a category label, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Blank` for empty input and
    /// `CategoryError::Reserved` for the `All` sentinel.
    pub fn parse(s: &str) -> Result<Self, CategoryError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::Blank);
        }
        if trimmed == ALL_CATEGORIES {
            return Err(CategoryError::Reserved);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Category selection used when browsing the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// Exactly one category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn admits(&self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    /// Display label, `All` for the sentinel.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == ALL_CATEGORIES {
            return Ok(Self::All);
        }
        Category::parse(s).map(Self::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}
