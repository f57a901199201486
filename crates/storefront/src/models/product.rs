//! Product listing types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecofinds_core::{Category, Price, ProductId, UserId};

/// A second-hand item listed for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: Price,
    /// Image URI; views fall back to a placeholder when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Seller's user ID. A soft reference: not checked against the registry.
    pub seller_id: UserId,
    /// Seller's display name at listing time.
    pub seller_name: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lowercased. An empty needle matches.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Whether `user` is the seller of this listing.
    #[must_use]
    pub fn is_sold_by(&self, user: &UserId) -> bool {
        &self.seller_id == user
    }
}

/// Fields supplied by a seller when creating a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial listing edit. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<Price>,
    pub image: Option<String>,
}

impl ListingUpdate {
    /// Merge the present fields into `product`.
    pub(crate) fn apply(&self, product: &mut Product) {
        if let Some(title) = &self.title {
            product.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = &self.image {
            product.image = Some(image.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mug() -> Product {
        Product {
            id: ProductId::new("p1"),
            title: "Ceramic Mug".to_owned(),
            description: "Hand-thrown, slightly chipped".to_owned(),
            category: Category::parse("Home").unwrap(),
            price: Price::from_cents(800),
            image: None,
            seller_id: UserId::new("u1"),
            seller_name: "bob".to_owned(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_matches_search_title_and_description() {
        let product = mug();
        assert!(product.matches_search(""));
        assert!(product.matches_search("mug"));
        assert!(product.matches_search("chipped"));
        assert!(!product.matches_search("lamp"));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(mug()).unwrap();
        assert_eq!(json["sellerId"], "u1");
        assert_eq!(json["sellerName"], "bob");
        assert_eq!(json["price"], "8.00");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_listing_update_apply() {
        let mut product = mug();
        ListingUpdate {
            price: Some(Price::from_cents(650)),
            ..ListingUpdate::default()
        }
        .apply(&mut product);

        assert_eq!(product.price, Price::from_cents(650));
        assert_eq!(product.title, "Ceramic Mug");
    }
}
