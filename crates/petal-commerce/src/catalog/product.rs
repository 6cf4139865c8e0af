//! Product types.

use crate::codec::decimal;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound of the product-detail quantity selector.
pub const MAX_SELECTION: u32 = 99;

/// Product category in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Jewellery,
    Nails,
}

impl ProductCategory {
    /// All categories, in navigation order.
    pub const ALL: [ProductCategory; 2] = [ProductCategory::Jewellery, ProductCategory::Nails];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Jewellery => "jewellery",
            ProductCategory::Nails => "nails",
        }
    }

    /// Label shown to shoppers.
    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Jewellery => "Jewellery",
            ProductCategory::Nails => "Nails",
        }
    }

    /// Image shown when a product has no usable picture.
    pub fn placeholder_image(&self) -> &'static str {
        match self {
            ProductCategory::Jewellery => "/assets/generated/placeholder-jewellery.dim_600x600.png",
            ProductCategory::Nails => "/assets/generated/placeholder-nails.dim_600x600.png",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jewellery" | "jewelry" => Ok(ProductCategory::Jewellery),
            "nails" => Ok(ProductCategory::Nails),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// A product in the catalog.
///
/// Identity is `id`: two values with the same id are the same product for
/// cart merging, even if other fields differ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Category.
    pub category: ProductCategory,
    /// Unit price in minor units.
    #[serde(with = "decimal")]
    pub price: u64,
    /// Units available at the gateway.
    #[serde(with = "decimal")]
    pub stock_quantity: u64,
    /// Full description.
    pub description: String,
    /// Image URL (may be blank).
    pub image_url: String,
    /// Ordered tags for filtering.
    pub tags: Vec<String>,
}

impl Product {
    /// Create a product with empty description, image and tags.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: ProductCategory,
        price: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            price,
            stock_quantity: 0,
            description: String::new(),
            image_url: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock_quantity: u64) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    /// Unit price as money.
    pub fn unit_price(&self) -> Money {
        Money::from_price(self.price)
    }

    /// Check if the product can't be added from the catalog.
    pub fn is_out_of_stock(&self) -> bool {
        self.stock_quantity == 0
    }

    /// Image to render: the product's own URL, or the category placeholder
    /// when the URL is blank or a sample-data address.
    pub fn display_image_url(&self) -> &str {
        let url = self.image_url.trim();
        if url.is_empty() || url.contains("example.com") {
            self.category.placeholder_image()
        } else {
            &self.image_url
        }
    }
}

/// Bound a product-detail quantity selection to `1..=min(stock, 99)`.
///
/// Returns `None` when the product is out of stock. The cart store never
/// applies this; stock is only enforced where the shopper picks a quantity.
pub fn clamp_selection(value: i64, stock: u64) -> Option<u32> {
    if stock == 0 {
        return None;
    }
    let max = u32::try_from(stock).unwrap_or(u32::MAX).min(MAX_SELECTION);
    let value = u32::try_from(value.max(1)).unwrap_or(u32::MAX);
    Some(value.min(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("Nails".parse::<ProductCategory>(), Ok(ProductCategory::Nails));
        assert_eq!("jewellery".parse::<ProductCategory>(), Ok(ProductCategory::Jewellery));
        assert!("shoes".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_out_of_stock() {
        let product = Product::new(ProductId::new(1), "Ring", ProductCategory::Jewellery, 100);
        assert!(product.is_out_of_stock());
        assert!(!product.with_stock(1).is_out_of_stock());
    }

    #[test]
    fn test_display_image_fallback() {
        let mut product = Product::new(ProductId::new(1), "Gel Set", ProductCategory::Nails, 100);
        assert_eq!(product.display_image_url(), ProductCategory::Nails.placeholder_image());

        product.image_url = "https://example.com/x.png".to_string();
        assert_eq!(product.display_image_url(), ProductCategory::Nails.placeholder_image());

        product.image_url = "https://cdn.petal.shop/gel.png".to_string();
        assert_eq!(product.display_image_url(), "https://cdn.petal.shop/gel.png");
    }

    #[test]
    fn test_clamp_selection() {
        assert_eq!(clamp_selection(5, 0), None);
        assert_eq!(clamp_selection(0, 10), Some(1));
        assert_eq!(clamp_selection(-3, 10), Some(1));
        assert_eq!(clamp_selection(12, 10), Some(10));
        assert_eq!(clamp_selection(500, u64::MAX), Some(MAX_SELECTION));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&ProductCategory::Jewellery).unwrap();
        assert_eq!(json, "\"jewellery\"");
    }
}
