//! Inventory ledger: atomic stock reservation and compensating release
//!
//! The ledger is a pure capacity counter with no knowledge of orders. A
//! reservation is a conditional decrement executed inside one redb write
//! transaction: the product is re-read after the transaction begins, the
//! condition (`active && stock >= quantity`) is checked against that read,
//! and the decrement commits with it. Because redb serializes write
//! transactions, two concurrent reservations against the same product can
//! never both observe the same pre-decrement stock — the lost-update race of
//! a read-then-write pair is impossible here.

use crate::storage::{EngineStore, StorageResult};
use shared::Product;

/// Result of a reservation attempt
#[derive(Debug, Clone)]
pub enum ReserveOutcome {
    /// Stock decremented; the product snapshot is as of the decrement,
    /// so `price` and `name` are the values to capture into the order
    Reserved(Product),
    /// Not enough stock; nothing was changed
    InsufficientStock { available: u32 },
    /// No such product
    NotFound,
    /// Product exists but is not purchasable
    Inactive,
}

/// Atomic stock operations over the engine store
#[derive(Clone)]
pub struct InventoryLedger {
    store: EngineStore,
}

impl InventoryLedger {
    pub fn new(store: EngineStore) -> Self {
        Self { store }
    }

    /// Reserve `quantity` units: decrement stock iff the product is active
    /// and has at least `quantity` available, in one transaction
    pub fn reserve(&self, product_id: &str, quantity: u32) -> StorageResult<ReserveOutcome> {
        let txn = self.store.begin_write()?;

        let Some(mut product) = self.store.get_product_txn(&txn, product_id)? else {
            return Ok(ReserveOutcome::NotFound);
        };
        if !product.is_active {
            return Ok(ReserveOutcome::Inactive);
        }
        if product.stock < quantity {
            return Ok(ReserveOutcome::InsufficientStock {
                available: product.stock,
            });
        }

        product.stock -= quantity;
        product.updated_at = shared::util::now_millis();
        self.store.put_product_txn(&txn, &product)?;
        txn.commit()?;

        Ok(ReserveOutcome::Reserved(product))
    }

    /// Reverse a reservation made earlier in a failed workflow instance
    ///
    /// Saturating: release never pushes stock past `u32::MAX`, and releasing
    /// against a product deleted meanwhile is a no-op (the reservation is
    /// simply gone with the product).
    pub fn release(&self, product_id: &str, quantity: u32) -> StorageResult<()> {
        let txn = self.store.begin_write()?;

        let Some(mut product) = self.store.get_product_txn(&txn, product_id)? else {
            return Ok(());
        };
        product.stock = product.stock.saturating_add(quantity);
        product.updated_at = shared::util::now_millis();
        self.store.put_product_txn(&txn, &product)?;
        txn.commit()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store(stock: u32, active: bool) -> (EngineStore, String) {
        let store = EngineStore::open_in_memory().unwrap();
        let mut product = Product::new("vendor-1", "Oranges", 3.0, stock, "kg");
        product.is_active = active;
        store.put_product(&product).unwrap();
        (store, product.id)
    }

    #[test]
    fn test_reserve_decrements() {
        let (store, product_id) = seeded_store(10, true);
        let ledger = InventoryLedger::new(store.clone());

        let outcome = ledger.reserve(&product_id, 4).unwrap();
        assert!(matches!(outcome, ReserveOutcome::Reserved(_)));
        assert_eq!(store.get_product(&product_id).unwrap().unwrap().stock, 6);
    }

    #[test]
    fn test_reserve_exact_stock() {
        let (store, product_id) = seeded_store(4, true);
        let ledger = InventoryLedger::new(store.clone());

        assert!(matches!(
            ledger.reserve(&product_id, 4).unwrap(),
            ReserveOutcome::Reserved(_)
        ));
        assert_eq!(store.get_product(&product_id).unwrap().unwrap().stock, 0);

        // Nothing left
        assert!(matches!(
            ledger.reserve(&product_id, 1).unwrap(),
            ReserveOutcome::InsufficientStock { available: 0 }
        ));
    }

    #[test]
    fn test_reserve_insufficient_leaves_stock_unchanged() {
        let (store, product_id) = seeded_store(3, true);
        let ledger = InventoryLedger::new(store.clone());

        let outcome = ledger.reserve(&product_id, 5).unwrap();
        assert!(matches!(
            outcome,
            ReserveOutcome::InsufficientStock { available: 3 }
        ));
        assert_eq!(store.get_product(&product_id).unwrap().unwrap().stock, 3);
    }

    #[test]
    fn test_reserve_inactive_and_missing() {
        let (store, product_id) = seeded_store(10, false);
        let ledger = InventoryLedger::new(store.clone());

        assert!(matches!(
            ledger.reserve(&product_id, 1).unwrap(),
            ReserveOutcome::Inactive
        ));
        assert!(matches!(
            ledger.reserve("missing", 1).unwrap(),
            ReserveOutcome::NotFound
        ));
    }

    #[test]
    fn test_release_restores_stock() {
        let (store, product_id) = seeded_store(10, true);
        let ledger = InventoryLedger::new(store.clone());

        ledger.reserve(&product_id, 7).unwrap();
        ledger.release(&product_id, 7).unwrap();
        assert_eq!(store.get_product(&product_id).unwrap().unwrap().stock, 10);
    }

    #[test]
    fn test_release_missing_product_is_noop() {
        let store = EngineStore::open_in_memory().unwrap();
        let ledger = InventoryLedger::new(store);
        ledger.release("missing", 3).unwrap();
    }

    #[test]
    fn test_concurrent_reservations_never_oversell() {
        let (store, product_id) = seeded_store(10, true);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = InventoryLedger::new(store.clone());
            let product_id = product_id.clone();
            handles.push(std::thread::spawn(move || {
                matches!(
                    ledger.reserve(&product_id, 3).unwrap(),
                    ReserveOutcome::Reserved(_)
                )
            }));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|reserved| *reserved)
            .count();

        // 8 threads each want 3 of 10: at most 3 can win
        assert_eq!(successes, 3);
        assert_eq!(store.get_product(&product_id).unwrap().unwrap().stock, 1);
    }
}
