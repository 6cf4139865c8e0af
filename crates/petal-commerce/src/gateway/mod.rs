//! Contract of the remote catalog/order service.
//!
//! The core only depends on [`StoreGateway`]. [`MemoryGateway`] is an
//! in-process stand-in and [`CachedGateway`] adds read caching with
//! invalidate-on-write in front of any implementation.

mod cached;
mod memory;

pub use cached::CachedGateway;
pub use memory::{GatewayCall, GatewayState, MemoryGateway};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductCategory};
use crate::checkout::{Order, OrderRequest};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};

/// Fields for a product the gateway has not assigned an id to yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: ProductCategory,
    pub description: String,
    #[serde(with = "crate::codec::decimal")]
    pub price: u64,
    pub image_url: String,
    #[serde(with = "crate::codec::decimal")]
    pub stock_quantity: u64,
    pub tags: Vec<String>,
}

impl NewProduct {
    pub(crate) fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            stock_quantity: self.stock_quantity,
            description: self.description,
            image_url: self.image_url,
            tags: self.tags,
        }
    }
}

/// Remote catalog and order operations.
///
/// Calls may suspend; none of them define a timeout.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Every product in the catalog.
    async fn get_all_products(&self) -> Result<Vec<Product>, CommerceError>;

    /// Products in one category.
    async fn get_products_by_category(
        &self,
        category: ProductCategory,
    ) -> Result<Vec<Product>, CommerceError>;

    /// One product. Fails with [`CommerceError::ProductNotFound`] for unknown ids.
    async fn get_product(&self, id: ProductId) -> Result<Product, CommerceError>;

    /// Create an order and return its identifier.
    async fn create_order(&self, request: &OrderRequest) -> Result<OrderId, CommerceError>;

    /// Every order placed so far.
    async fn get_all_orders(&self) -> Result<Vec<Order>, CommerceError>;

    /// Add a product to the catalog.
    async fn add_product(&self, product: NewProduct) -> Result<ProductId, CommerceError>;

    /// Set a product's stock level.
    async fn update_product_stock(
        &self,
        product_id: ProductId,
        quantity: u64,
    ) -> Result<(), CommerceError>;

    /// Populate the catalog with the starter products.
    async fn seed_products(&self) -> Result<(), CommerceError>;
}

/// Result of a product-detail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductLookup {
    Found(Product),
    NotFound(ProductId),
}

/// Fetch a product, turning an unknown id into a view state instead of an error.
pub async fn lookup_product<G>(gateway: &G, id: ProductId) -> Result<ProductLookup, CommerceError>
where
    G: StoreGateway + ?Sized,
{
    match gateway.get_product(id).await {
        Ok(product) => Ok(ProductLookup::Found(product)),
        Err(CommerceError::ProductNotFound(id)) => Ok(ProductLookup::NotFound(id)),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_product_not_found_is_a_state() {
        let gateway = MemoryGateway::seeded();
        let lookup = lookup_product(&gateway, ProductId::new(9_999)).await.unwrap();
        assert_eq!(lookup, ProductLookup::NotFound(ProductId::new(9_999)));
    }

    #[tokio::test]
    async fn test_lookup_product_found() {
        let gateway = MemoryGateway::seeded();
        let lookup = lookup_product(&gateway, ProductId::new(1)).await.unwrap();
        assert!(matches!(lookup, ProductLookup::Found(p) if p.id == ProductId::new(1)));
    }

    #[tokio::test]
    async fn test_lookup_product_through_trait_object() {
        let gateway: Box<dyn StoreGateway> = Box::new(MemoryGateway::seeded());
        let lookup = lookup_product(gateway.as_ref(), ProductId::new(2)).await.unwrap();
        assert!(matches!(lookup, ProductLookup::Found(_)));
    }
}
