//! The owning cart store.

use std::sync::Arc;

use petal_cache::MemoryStore;
use tokio::sync::watch;

use crate::cart::{CartLine, CartPersistence, CartSnapshot, CartState, DEFAULT_SLOT_KEY};
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;

/// Authoritative in-memory cart.
///
/// Constructed once per session and handed by reference to whatever needs it.
/// Every mutation writes the full state through the persistence adapter and
/// publishes a fresh [`CartSnapshot`] to subscribers. Neither side effect can
/// make a mutation fail.
///
/// # Example
///
/// ```rust,ignore
/// let mut cart = CartStore::open(CartPersistence::new(store, "petal-cart"));
/// let mut updates = cart.subscribe();
///
/// cart.add_item(product, 2);
/// updates.changed().await?;
/// assert_eq!(updates.borrow().item_count, 2);
/// ```
pub struct CartStore {
    state: CartState,
    is_open: bool,
    persistence: CartPersistence,
    updates: watch::Sender<Arc<CartSnapshot>>,
}

impl CartStore {
    /// Restore the cart from the persistence slot, or start empty.
    pub fn open(persistence: CartPersistence) -> Self {
        let state = persistence.load();
        tracing::debug!(
            key = persistence.key(),
            lines = state.lines.len(),
            "cart restored"
        );
        let (updates, _) = watch::channel(Arc::new(CartSnapshot::capture(&state, false)));
        Self {
            state,
            is_open: false,
            persistence,
            updates,
        }
    }

    /// A store backed by a throwaway in-memory slot.
    pub fn in_memory() -> Self {
        Self::open(CartPersistence::new(
            Arc::new(MemoryStore::new()),
            DEFAULT_SLOT_KEY,
        ))
    }

    /// Current cart lines.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.state.lines
    }

    /// Get the line for a product.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.state.line(product_id)
    }

    /// Sum of line quantities, recomputed on every call.
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// Sum of `price × quantity`, recomputed on every call.
    pub fn subtotal(&self) -> Money {
        self.state.subtotal()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Whether the cart drawer should be shown.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Most recently published snapshot.
    pub fn snapshot(&self) -> Arc<CartSnapshot> {
        self.updates.borrow().clone()
    }

    /// Subscribe to snapshots published after each change.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CartSnapshot>> {
        self.updates.subscribe()
    }

    /// Add `quantity` units of a product.
    ///
    /// Merges into the existing line for the same product id, otherwise
    /// appends a new line. Always opens the cart drawer. Stock is not
    /// checked here.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            tracing::debug!(product_id = %product.id, "ignoring zero-quantity add");
            return;
        }

        let product_id = product.id;
        match self.state.position(product_id) {
            Some(index) => {
                let line = &mut self.state.lines[index];
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => self.state.lines.push(CartLine { product, quantity }),
        }
        self.is_open = true;

        tracing::debug!(%product_id, quantity, "cart item added");
        self.commit();
    }

    /// Add a single unit of a product.
    pub fn add_one(&mut self, product: Product) {
        self.add_item(product, 1);
    }

    /// Remove the line for a product. No-op if absent.
    pub fn remove_item(&mut self, product_id: ProductId) {
        let Some(index) = self.state.position(product_id) else {
            return;
        };
        self.state.lines.remove(index);

        tracing::debug!(%product_id, "cart item removed");
        self.commit();
    }

    /// Set a line's quantity exactly.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` saturate. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let Some(index) = self.state.position(product_id) else {
            return;
        };
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.state.lines[index].quantity = quantity;

        tracing::debug!(%product_id, quantity, "cart quantity set");
        self.commit();
    }

    /// Empty the cart unconditionally.
    pub fn clear_cart(&mut self) {
        self.state.lines.clear();
        tracing::debug!("cart cleared");
        self.commit();
    }

    /// Show the cart drawer.
    pub fn open_cart(&mut self) {
        self.is_open = true;
        self.publish();
    }

    /// Hide the cart drawer.
    pub fn close_cart(&mut self) {
        self.is_open = false;
        self.publish();
    }

    fn commit(&mut self) {
        self.persistence.save(&self.state);
        self.publish();
    }

    fn publish(&self) {
        self.updates
            .send_replace(Arc::new(CartSnapshot::capture(&self.state, self.is_open)));
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("is_open", &self.is_open)
            .field("persistence", &self.persistence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductCategory;
    use petal_cache::SlotStore;

    fn product(id: u64, price: u64) -> Product {
        Product::new(ProductId::new(id), format!("Product {id}"), ProductCategory::Nails, price)
            .with_stock(10)
    }

    fn store_with_slot() -> (CartStore, Arc<MemoryStore>) {
        let slot = Arc::new(MemoryStore::new());
        let cart = CartStore::open(CartPersistence::new(slot.clone(), DEFAULT_SLOT_KEY));
        (cart, slot)
    }

    fn assert_unique_ids(cart: &CartStore) {
        let mut ids: Vec<_> = cart.lines().iter().map(|l| l.product.id).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_add_item_merges_by_id() {
        let mut cart = CartStore::in_memory();
        cart.add_item(product(1, 100), 1);
        cart.add_item(product(1, 100), 2);
        cart.add_one(product(2, 50));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.line(ProductId::new(1)).map(|l| l.quantity), Some(3));
        assert_eq!(cart.item_count(), 4);
        assert!(cart.is_open());
    }

    #[test]
    fn test_add_item_keeps_insertion_order() {
        let mut cart = CartStore::in_memory();
        cart.add_one(product(3, 1));
        cart.add_one(product(1, 1));
        cart.add_one(product(3, 1));

        let ids: Vec<u64> = cart.lines().iter().map(|l| l.product.id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_add_item_ignores_stock() {
        let mut cart = CartStore::in_memory();
        cart.add_item(product(1, 100), 25);
        assert_eq!(cart.item_count(), 25);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = CartStore::in_memory();
        cart.add_item(product(1, 100), 0);
        assert!(cart.is_empty());
        assert!(!cart.is_open());
    }

    #[test]
    fn test_subtotal_example() {
        let mut cart = CartStore::in_memory();
        cart.add_item(product(1, 50_000), 2);
        cart.add_item(product(2, 120_000), 1);
        assert_eq!(cart.subtotal(), Money::new(220_000));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_update_quantity_replaces_and_is_idempotent() {
        let mut cart = CartStore::in_memory();
        cart.add_item(product(1, 10), 2);

        cart.update_quantity(ProductId::new(1), 5);
        let once = cart.state().clone();
        cart.update_quantity(ProductId::new(1), 5);

        assert_eq!(cart.state(), &once);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_update_quantity_zero_matches_remove() {
        let mut a = CartStore::in_memory();
        let mut b = CartStore::in_memory();
        for cart in [&mut a, &mut b] {
            cart.add_item(product(1, 10), 2);
            cart.add_item(product(2, 20), 1);
        }

        a.update_quantity(ProductId::new(1), 0);
        b.remove_item(ProductId::new(1));
        assert_eq!(a.state(), b.state());

        a.update_quantity(ProductId::new(2), -4);
        assert!(a.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_is_noop() {
        let mut cart = CartStore::in_memory();
        cart.add_one(product(1, 10));
        cart.update_quantity(ProductId::new(9), 4);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = CartStore::in_memory();
        cart.add_one(product(1, 10));
        cart.remove_item(ProductId::new(2));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_mixed_sequence_never_duplicates() {
        let mut cart = CartStore::in_memory();
        for step in 0..60u64 {
            let id = step % 4;
            match step % 5 {
                0 | 1 => cart.add_item(product(id, 10 * id + 1), (step % 3) as u32 + 1),
                2 => cart.update_quantity(ProductId::new(id), (step % 4) as i64 - 1),
                3 => cart.remove_item(ProductId::new((id + 1) % 4)),
                _ => cart.add_one(product(id, 10 * id + 1)),
            }
            assert_unique_ids(&cart);
            assert!(cart.lines().iter().all(|l| l.quantity > 0));

            let expected_count: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();
            let expected_total: u128 = cart
                .lines()
                .iter()
                .map(|l| l.product.price as u128 * l.quantity as u128)
                .sum();
            assert_eq!(cart.item_count(), expected_count);
            assert_eq!(cart.subtotal().minor_units(), expected_total);
        }
    }

    #[test]
    fn test_every_mutation_persists() {
        let (mut cart, slot) = store_with_slot();
        cart.add_item(product(u64::MAX, u64::MAX), 2);

        let restored = CartStore::open(CartPersistence::new(slot.clone(), DEFAULT_SLOT_KEY));
        assert_eq!(restored.state(), cart.state());
        assert!(!restored.is_open());

        cart.clear_cart();
        assert_eq!(slot.get(DEFAULT_SLOT_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_write_failure_does_not_block_mutation() {
        let slot = Arc::new(MemoryStore::with_quota(8));
        let mut cart = CartStore::open(CartPersistence::new(slot, DEFAULT_SLOT_KEY));
        cart.add_item(product(1, 10), 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_snapshot_published_on_change() {
        let mut cart = CartStore::in_memory();
        let mut updates = cart.subscribe();
        assert!(!updates.has_changed().unwrap());

        cart.add_item(product(1, 500), 2);
        assert!(updates.has_changed().unwrap());
        let snapshot = updates.borrow_and_update().clone();
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.subtotal, Money::new(1_000));
        assert!(snapshot.is_open);

        cart.close_cart();
        assert!(!updates.borrow_and_update().is_open);
        assert_eq!(cart.snapshot().item_count, 2);
    }
}
