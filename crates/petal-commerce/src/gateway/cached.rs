//! Read-through cache in front of a gateway.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use petal_cache::cache_key;

use crate::catalog::{Product, ProductCategory};
use crate::checkout::{Order, OrderRequest};
use crate::error::CommerceError;
use crate::gateway::{NewProduct, StoreGateway};
use crate::ids::{OrderId, ProductId};

/// Key prefix shared by every cached product read (lists and details).
const PRODUCT_PREFIX: &str = "product";
const ORDERS_KEY: &str = "orders";

#[derive(Debug, Clone)]
enum Cached {
    Products(Vec<Product>),
    Product(Product),
    Orders(Vec<Order>),
}

/// Memoises catalog and order-list reads; writes invalidate what they touch.
///
/// Keys: `products`, `products/category/<c>`, `product/<id>`, `orders`.
/// A successful order invalidates every product key (stock changed) and the
/// order list.
#[derive(Debug)]
pub struct CachedGateway<G> {
    inner: G,
    entries: Mutex<HashMap<String, Cached>>,
}

impl<G: StoreGateway> CachedGateway<G> {
    /// Wrap a gateway.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The wrapped gateway.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Check if a key currently holds a value.
    pub fn is_cached(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|e| e.contains_key(key))
            .unwrap_or(false)
    }

    /// Drop every entry whose key starts with `prefix`.
    pub fn invalidate(&self, prefix: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            let before = entries.len();
            entries.retain(|key, _| !key.starts_with(prefix));
            tracing::debug!(prefix, dropped = before - entries.len(), "cache invalidated");
        }
    }

    fn lookup(&self, key: &str) -> Option<Cached> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: String, value: Cached) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, value);
        }
    }

    async fn cached_products<F>(&self, key: String, fetch: F) -> Result<Vec<Product>, CommerceError>
    where
        F: std::future::Future<Output = Result<Vec<Product>, CommerceError>> + Send,
    {
        if let Some(Cached::Products(products)) = self.lookup(&key) {
            return Ok(products);
        }
        let products = fetch.await?;
        self.store(key, Cached::Products(products.clone()));
        Ok(products)
    }
}

#[async_trait]
impl<G: StoreGateway> StoreGateway for CachedGateway<G> {
    async fn get_all_products(&self) -> Result<Vec<Product>, CommerceError> {
        self.cached_products("products".to_string(), self.inner.get_all_products())
            .await
    }

    async fn get_products_by_category(
        &self,
        category: ProductCategory,
    ) -> Result<Vec<Product>, CommerceError> {
        let key = cache_key!("products", "category", category);
        self.cached_products(key, self.inner.get_products_by_category(category))
            .await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CommerceError> {
        let key = cache_key!(PRODUCT_PREFIX, id);
        if let Some(Cached::Product(product)) = self.lookup(&key) {
            return Ok(product);
        }
        let product = self.inner.get_product(id).await?;
        self.store(key, Cached::Product(product.clone()));
        Ok(product)
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<OrderId, CommerceError> {
        let id = self.inner.create_order(request).await?;
        self.invalidate(PRODUCT_PREFIX);
        self.invalidate(ORDERS_KEY);
        Ok(id)
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>, CommerceError> {
        if let Some(Cached::Orders(orders)) = self.lookup(ORDERS_KEY) {
            return Ok(orders);
        }
        let orders = self.inner.get_all_orders().await?;
        self.store(ORDERS_KEY.to_string(), Cached::Orders(orders.clone()));
        Ok(orders)
    }

    async fn add_product(&self, product: NewProduct) -> Result<ProductId, CommerceError> {
        let id = self.inner.add_product(product).await?;
        self.invalidate(PRODUCT_PREFIX);
        Ok(id)
    }

    async fn update_product_stock(
        &self,
        product_id: ProductId,
        quantity: u64,
    ) -> Result<(), CommerceError> {
        self.inner.update_product_stock(product_id, quantity).await?;
        self.invalidate(PRODUCT_PREFIX);
        Ok(())
    }

    async fn seed_products(&self) -> Result<(), CommerceError> {
        self.inner.seed_products().await?;
        self.invalidate(PRODUCT_PREFIX);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{OrderItem, ShippingAddress};
    use crate::gateway::{GatewayCall, MemoryGateway};

    fn order_for(id: u64) -> OrderRequest {
        OrderRequest {
            customer_name: "Asha".to_string(),
            email: "asha@example.in".to_string(),
            shipping_address: ShippingAddress::default(),
            items: vec![OrderItem {
                product_id: ProductId::new(id),
                quantity: 1,
            }],
        }
    }

    fn count(gateway: &CachedGateway<MemoryGateway>, call: &GatewayCall) -> usize {
        gateway.inner().calls().iter().filter(|c| *c == call).count()
    }

    #[tokio::test]
    async fn test_reads_are_memoised() {
        let gateway = CachedGateway::new(MemoryGateway::seeded());
        gateway.get_all_products().await.unwrap();
        gateway.get_all_products().await.unwrap();
        gateway.get_product(ProductId::new(1)).await.unwrap();
        gateway.get_product(ProductId::new(1)).await.unwrap();

        assert_eq!(count(&gateway, &GatewayCall::GetAllProducts), 1);
        assert_eq!(count(&gateway, &GatewayCall::GetProduct(ProductId::new(1))), 1);
        assert!(gateway.is_cached("products"));
        assert!(gateway.is_cached("product/1"));
    }

    #[tokio::test]
    async fn test_order_invalidates_stock_and_orders() {
        let gateway = CachedGateway::new(MemoryGateway::seeded());
        gateway.get_all_products().await.unwrap();
        gateway
            .get_products_by_category(ProductCategory::Nails)
            .await
            .unwrap();
        gateway.get_product(ProductId::new(4)).await.unwrap();
        assert!(gateway.get_all_orders().await.unwrap().is_empty());

        gateway.create_order(&order_for(4)).await.unwrap();

        assert!(!gateway.is_cached("products"));
        assert!(!gateway.is_cached("products/category/nails"));
        assert!(!gateway.is_cached("product/4"));
        assert!(!gateway.is_cached(ORDERS_KEY));
        assert_eq!(gateway.get_all_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_order_keeps_cache() {
        let gateway = CachedGateway::new(MemoryGateway::seeded());
        gateway.get_all_products().await.unwrap();
        gateway.inner().reject_orders("closed");

        assert!(gateway.create_order(&order_for(1)).await.is_err());
        assert!(gateway.is_cached("products"));
    }

    #[tokio::test]
    async fn test_stock_update_refreshes_detail() {
        let gateway = CachedGateway::new(MemoryGateway::seeded());
        assert_eq!(gateway.get_product(ProductId::new(2)).await.unwrap().stock_quantity, 12);

        gateway.update_product_stock(ProductId::new(2), 3).await.unwrap();
        assert_eq!(gateway.get_product(ProductId::new(2)).await.unwrap().stock_quantity, 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_cached() {
        let gateway = CachedGateway::new(MemoryGateway::new());
        assert!(gateway.get_product(ProductId::new(5)).await.is_err());
        assert!(!gateway.is_cached("product/5"));
    }
}
