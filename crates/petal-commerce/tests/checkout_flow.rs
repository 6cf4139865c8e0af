//! End-to-end checkout against a file-backed cart slot.

use std::sync::Arc;

use petal_cache::{FileStore, SlotStore};
use petal_commerce::prelude::*;
use petal_commerce::cart::DEFAULT_SLOT_KEY;

fn open_cart(store: &Arc<FileStore>) -> CartStore {
    CartStore::open(CartPersistence::new(store.clone(), DEFAULT_SLOT_KEY))
}

fn fill(checkout: &mut Checkout) {
    checkout.set_field(FormField::Name, "Meera Iyer");
    checkout.set_field(FormField::Email, "meera@example.in");
    checkout.set_field(FormField::Street, "4 Lake View");
    checkout.set_field(FormField::City, "Chennai");
    checkout.set_field(FormField::State, "Tamil Nadu");
    checkout.set_field(FormField::PostalCode, "600001");
}

#[tokio::test]
async fn cart_survives_restart_and_clears_after_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).unwrap());
    let gateway = CachedGateway::new(MemoryGateway::seeded());

    {
        let mut cart = open_cart(&store);
        let hoops = gateway.get_product(ProductId::new(1)).await.unwrap();
        let tips = gateway.get_product(ProductId::new(5)).await.unwrap();
        cart.add_item(hoops, 2);
        cart.add_one(tips);
    }

    let mut cart = open_cart(&store);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal(), Money::new(2 * 1_499 + 749));
    assert!(!cart.is_open());

    let relay = RecordingRelay::new();
    let mut checkout = Checkout::new();
    fill(&mut checkout);
    let outcome = checkout
        .submit(&mut cart, &gateway, SubmitMode::Relay, &relay)
        .await
        .unwrap();

    assert_eq!(outcome.navigation, Navigation::OrderConfirmation(outcome.order_id));
    assert_eq!(relay.sent().len(), 1);
    assert_eq!(store.get(DEFAULT_SLOT_KEY).unwrap().as_deref(), Some("[]"));
    assert!(open_cart(&store).is_empty());

    let orders = gateway.get_all_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total_price, 2 * 1_499 + 749);
    assert_eq!(orders[0].customer_name, "Meera Iyer");
}

#[tokio::test]
async fn rejected_order_keeps_persisted_cart() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).unwrap());
    let gateway = MemoryGateway::seeded();
    gateway.reject_orders("payments offline");

    let mut cart = open_cart(&store);
    cart.add_item(gateway.get_product(ProductId::new(4)).await.unwrap(), 2);

    let mut checkout = Checkout::new();
    fill(&mut checkout);
    let err = checkout
        .submit(&mut cart, &gateway, SubmitMode::Direct, &RecordingRelay::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CommerceError::OrderRejected(_)));
    assert_eq!(checkout.phase(), CheckoutPhase::Failed);
    assert_eq!(open_cart(&store).item_count(), 2);
    assert_eq!(checkout.form().city, "Chennai");
}

#[tokio::test]
async fn corrupt_slot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).unwrap());
    store.set(DEFAULT_SLOT_KEY, "{not json").unwrap();

    let mut cart = open_cart(&store);
    assert!(cart.is_empty());

    let product = Product::new(ProductId::new(u64::MAX), "Big Id", ProductCategory::Nails, u64::MAX);
    cart.add_item(product, 1);
    let restored = open_cart(&store);
    assert_eq!(restored.lines()[0].product.id.get(), u64::MAX);
    assert_eq!(restored.lines()[0].product.price, u64::MAX);
}
