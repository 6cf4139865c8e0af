//! In-process gateway.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductCategory};
use crate::checkout::{Order, OrderRequest};
use crate::error::CommerceError;
use crate::gateway::{NewProduct, StoreGateway};
use crate::ids::{OrderId, ProductId};
use crate::money::Money;

/// A gateway operation, recorded in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    GetAllProducts,
    GetProductsByCategory(ProductCategory),
    GetProduct(ProductId),
    CreateOrder(OrderRequest),
    GetAllOrders,
    AddProduct(String),
    UpdateProductStock(ProductId, u64),
    SeedProducts,
}

/// Durable contents of a [`MemoryGateway`]: catalog, orders and the last
/// ids issued. The call log and rejection switch are not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayState {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    #[serde(with = "crate::codec::decimal")]
    pub last_product_id: u64,
    #[serde(with = "crate::codec::decimal")]
    pub last_order_id: u64,
}

#[derive(Debug, Default)]
struct Inner {
    products: Vec<Product>,
    orders: Vec<Order>,
    last_product_id: u64,
    last_order_id: u64,
    reject_orders: Option<String>,
    calls: Vec<GatewayCall>,
}

impl Inner {
    fn insert_product(&mut self, product: NewProduct) -> ProductId {
        self.last_product_id += 1;
        let id = ProductId::new(self.last_product_id);
        self.products.push(product.into_product(id));
        id
    }

    fn product(&self, id: ProductId) -> Result<&Product, CommerceError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(CommerceError::ProductNotFound(id))
    }
}

/// Gateway that keeps the catalog and orders in memory.
///
/// Product and order ids are assigned sequentially from 1. Orders don't
/// reserve stock. Every call is recorded so callers can assert on what was
/// sent.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

impl MemoryGateway {
    /// Create an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway holding the starter catalog.
    pub fn seeded() -> Self {
        let gateway = Self::new();
        if let Ok(mut inner) = gateway.inner.lock() {
            for product in starter_catalog() {
                inner.insert_product(product);
            }
        }
        gateway
    }

    /// Restore a gateway from saved state.
    ///
    /// Id counters never fall below the largest id already present, so
    /// restored gateways keep issuing fresh ids.
    pub fn from_state(state: GatewayState) -> Self {
        let max_product = state.products.iter().map(|p| p.id.get()).max().unwrap_or(0);
        let max_order = state.orders.iter().map(|o| o.id.get()).max().unwrap_or(0);
        let inner = Inner {
            last_product_id: state.last_product_id.max(max_product),
            last_order_id: state.last_order_id.max(max_order),
            products: state.products,
            orders: state.orders,
            ..Inner::default()
        };
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Snapshot of the catalog, orders and id counters.
    pub fn state(&self) -> GatewayState {
        self.inner
            .lock()
            .map(|inner| GatewayState {
                products: inner.products.clone(),
                orders: inner.orders.clone(),
                last_product_id: inner.last_product_id,
                last_order_id: inner.last_order_id,
            })
            .unwrap_or_default()
    }

    /// Make every subsequent `create_order` fail with `reason`.
    pub fn reject_orders(&self, reason: impl Into<String>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.reject_orders = Some(reason.into());
        }
    }

    /// Accept orders again.
    pub fn accept_orders(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.reject_orders = None;
        }
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.inner
            .lock()
            .map(|inner| inner.calls.clone())
            .unwrap_or_default()
    }

    /// Number of `create_order` calls received so far.
    pub fn create_order_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, GatewayCall::CreateOrder(_)))
            .count()
    }

    fn lock(&self, call: GatewayCall) -> Result<MutexGuard<'_, Inner>, CommerceError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| CommerceError::Gateway(e.to_string()))?;
        inner.calls.push(call);
        Ok(inner)
    }
}

#[async_trait]
impl StoreGateway for MemoryGateway {
    async fn get_all_products(&self) -> Result<Vec<Product>, CommerceError> {
        let inner = self.lock(GatewayCall::GetAllProducts)?;
        Ok(inner.products.clone())
    }

    async fn get_products_by_category(
        &self,
        category: ProductCategory,
    ) -> Result<Vec<Product>, CommerceError> {
        let inner = self.lock(GatewayCall::GetProductsByCategory(category))?;
        Ok(inner
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CommerceError> {
        let inner = self.lock(GatewayCall::GetProduct(id))?;
        inner.product(id).cloned()
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<OrderId, CommerceError> {
        let mut inner = self.lock(GatewayCall::CreateOrder(request.clone()))?;

        if let Some(reason) = &inner.reject_orders {
            return Err(CommerceError::OrderRejected(reason.clone()));
        }
        if request.items.is_empty() {
            return Err(CommerceError::OrderRejected("order has no items".to_string()));
        }

        let mut total = Money::ZERO;
        for item in &request.items {
            let price = inner.product(item.product_id)?.price;
            let quantity = u32::try_from(item.quantity).map_err(|_| {
                CommerceError::OrderRejected(format!("quantity {} out of range", item.quantity))
            })?;
            total = total + Money::line_total(price, quantity);
        }
        let total_price = total
            .to_u64()
            .ok_or_else(|| CommerceError::OrderRejected("order total out of range".to_string()))?;

        inner.last_order_id += 1;
        let id = OrderId::new(inner.last_order_id);
        inner.orders.push(Order {
            id,
            customer_name: request.customer_name.clone(),
            email: request.email.clone(),
            shipping_address: request.shipping_address.clone(),
            items: request.items.clone(),
            total_price,
        });
        Ok(id)
    }

    async fn get_all_orders(&self) -> Result<Vec<Order>, CommerceError> {
        let inner = self.lock(GatewayCall::GetAllOrders)?;
        Ok(inner.orders.clone())
    }

    async fn add_product(&self, product: NewProduct) -> Result<ProductId, CommerceError> {
        let mut inner = self.lock(GatewayCall::AddProduct(product.name.clone()))?;
        Ok(inner.insert_product(product))
    }

    async fn update_product_stock(
        &self,
        product_id: ProductId,
        quantity: u64,
    ) -> Result<(), CommerceError> {
        let mut inner = self.lock(GatewayCall::UpdateProductStock(product_id, quantity))?;
        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(CommerceError::ProductNotFound(product_id))?;
        product.stock_quantity = quantity;
        Ok(())
    }

    async fn seed_products(&self) -> Result<(), CommerceError> {
        let mut inner = self.lock(GatewayCall::SeedProducts)?;
        if inner.products.is_empty() {
            for product in starter_catalog() {
                inner.insert_product(product);
            }
        }
        Ok(())
    }
}

fn starter_catalog() -> Vec<NewProduct> {
    fn item(
        name: &str,
        category: ProductCategory,
        price: u64,
        stock_quantity: u64,
        description: &str,
        tags: &[&str],
    ) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category,
            description: description.to_string(),
            price,
            image_url: String::new(),
            stock_quantity,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    vec![
        item(
            "Rose Gold Hoops",
            ProductCategory::Jewellery,
            1_499,
            25,
            "Lightweight hoops in rose gold plating.",
            &["earrings", "bestseller"],
        ),
        item(
            "Pearl Drop Necklace",
            ProductCategory::Jewellery,
            2_899,
            12,
            "Freshwater pearl on a fine chain.",
            &["necklace", "gift"],
        ),
        item(
            "Stackable Band Set",
            ProductCategory::Jewellery,
            999,
            0,
            "Three thin bands to wear together.",
            &["rings"],
        ),
        item(
            "Blush Press-On Set",
            ProductCategory::Nails,
            599,
            40,
            "Twenty-four almond press-ons in soft blush.",
            &["press-on", "bestseller"],
        ),
        item(
            "Chrome Glaze Tips",
            ProductCategory::Nails,
            749,
            18,
            "Mirror-finish chrome tips, medium length.",
            &["press-on", "chrome"],
        ),
        item(
            "Cuticle Care Oil",
            ProductCategory::Nails,
            349,
            60,
            "Almond and vitamin E cuticle oil.",
            &["care"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::{OrderItem, ShippingAddress};

    fn request(items: Vec<(u64, u64)>) -> OrderRequest {
        OrderRequest {
            customer_name: "Asha".to_string(),
            email: "asha@example.in".to_string(),
            shipping_address: ShippingAddress::default(),
            items: items
                .into_iter()
                .map(|(id, quantity)| OrderItem {
                    product_id: ProductId::new(id),
                    quantity,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_seeded_catalog() {
        let gateway = MemoryGateway::seeded();
        let all = gateway.get_all_products().await.unwrap();
        assert_eq!(all.len(), 6);

        let nails = gateway
            .get_products_by_category(ProductCategory::Nails)
            .await
            .unwrap();
        assert!(nails.iter().all(|p| p.category == ProductCategory::Nails));
        assert_eq!(nails.len(), 3);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let gateway = MemoryGateway::new();
        gateway.seed_products().await.unwrap();
        gateway.seed_products().await.unwrap();
        assert_eq!(gateway.get_all_products().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let gateway = MemoryGateway::new();
        let err = gateway.get_product(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, CommerceError::ProductNotFound(id) if id == ProductId::new(1)));
    }

    #[tokio::test]
    async fn test_create_order_totals_and_ids() {
        let gateway = MemoryGateway::seeded();
        let first = gateway.create_order(&request(vec![(1, 2), (4, 1)])).await.unwrap();
        let second = gateway.create_order(&request(vec![(6, 1)])).await.unwrap();
        assert_eq!(first, OrderId::new(1));
        assert_eq!(second, OrderId::new(2));

        let orders = gateway.get_all_orders().await.unwrap();
        assert_eq!(orders[0].total_price, 2 * 1_499 + 599);
        assert_eq!(orders[0].unit_count(), 3);
        assert_eq!(gateway.create_order_calls(), 2);
    }

    #[tokio::test]
    async fn test_create_order_rejections() {
        let gateway = MemoryGateway::seeded();
        assert!(matches!(
            gateway.create_order(&request(vec![])).await,
            Err(CommerceError::OrderRejected(_))
        ));
        assert!(matches!(
            gateway.create_order(&request(vec![(77, 1)])).await,
            Err(CommerceError::ProductNotFound(_))
        ));

        gateway.reject_orders("maintenance");
        assert!(matches!(
            gateway.create_order(&request(vec![(1, 1)])).await,
            Err(CommerceError::OrderRejected(reason)) if reason == "maintenance"
        ));
        gateway.accept_orders();
        assert!(gateway.create_order(&request(vec![(1, 1)])).await.is_ok());
        assert_eq!(gateway.get_all_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_restored_state_keeps_issuing_fresh_ids() {
        let gateway = MemoryGateway::seeded();
        gateway.create_order(&request(vec![(1, 1)])).await.unwrap();
        gateway.update_product_stock(ProductId::new(2), 4).await.unwrap();

        let text = serde_json::to_string(&gateway.state()).unwrap();
        let restored = MemoryGateway::from_state(serde_json::from_str(&text).unwrap());

        let next = restored.create_order(&request(vec![(4, 2)])).await.unwrap();
        assert_eq!(next, OrderId::new(2));
        assert_eq!(restored.get_all_orders().await.unwrap().len(), 2);
        assert_eq!(restored.get_product(ProductId::new(2)).await.unwrap().stock_quantity, 4);
        assert!(restored.calls().iter().all(|c| !matches!(c, GatewayCall::SeedProducts)));
    }

    #[tokio::test]
    async fn test_restored_counters_never_reuse_ids() {
        let mut state = MemoryGateway::seeded().state();
        state.last_product_id = 0;
        let restored = MemoryGateway::from_state(state);

        let id = restored
            .add_product(NewProduct {
                name: "Opal Studs".to_string(),
                category: ProductCategory::Jewellery,
                description: String::new(),
                price: 1_299,
                image_url: String::new(),
                stock_quantity: 5,
                tags: vec![],
            })
            .await
            .unwrap();
        assert_eq!(id, ProductId::new(7));
    }

    #[tokio::test]
    async fn test_update_stock_and_add_product() {
        let gateway = MemoryGateway::seeded();
        gateway.update_product_stock(ProductId::new(3), 9).await.unwrap();
        assert_eq!(gateway.get_product(ProductId::new(3)).await.unwrap().stock_quantity, 9);

        let id = gateway
            .add_product(NewProduct {
                name: "Opal Studs".to_string(),
                category: ProductCategory::Jewellery,
                description: String::new(),
                price: 1_299,
                image_url: String::new(),
                stock_quantity: 5,
                tags: vec![],
            })
            .await
            .unwrap();
        assert_eq!(id, ProductId::new(7));
        assert!(gateway
            .calls()
            .contains(&GatewayCall::AddProduct("Opal Studs".to_string())));
    }
}
