//! redb-based storage layer for the fulfillment engine
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `products` | `product_id` | `Product` | Catalog with stock counters |
//! | `vendors` | `vendor_id` | `Vendor` | Vendor directory |
//! | `orders` | `order_id` | `Order` | Order aggregates |
//! | `orders_by_user` | `(user_id, order_id)` | `()` | User order index |
//! | `orders_by_vendor` | `(vendor_id, order_id)` | `()` | Vendor order index |
//! | `payments` | `payment_id` | `Payment` | Payment records |
//! | `payment_by_order` | `order_id` | `payment_id` | Payment uniqueness index |
//! | `notifications` | `notification_id` | `Notification` | Append-only events |
//! | `carts` | `user_id` | `Vec<CartLine>` | Per-user carts |
//!
//! # Concurrency
//!
//! redb serializes write transactions: at most one is open at a time, and a
//! commit is atomic. The stock decrement in `inventory` re-reads the product
//! inside its write transaction, which is exactly the conditional-update
//! primitive the placement workflow depends on — two concurrent placements
//! against the same product cannot both observe the same pre-decrement
//! stock.
//!
//! Values are JSON-serialized; helpers come in committed (`&self`) and
//! transaction-scoped (`_txn`) flavors so multi-entity invariants (payment
//! uniqueness, payment/order settlement) can be composed atomically by the
//! service layer.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::{CartLine, Notification, Order, Payment, Product, Vendor};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");
const VENDORS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("vendors");
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Secondary index: key = (user_id, order_id), value = empty
const ORDERS_BY_USER_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("orders_by_user");

/// Secondary index: key = (vendor_id, order_id), value = empty
const ORDERS_BY_VENDOR_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("orders_by_vendor");

const PAYMENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("payments");

/// Uniqueness index: key = order_id, value = payment_id
const PAYMENT_BY_ORDER_TABLE: TableDefinition<&str, &str> =
    TableDefinition::new("payment_by_order");

const NOTIFICATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("notifications");
const CARTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("carts");

/// Upper bound for the second component of a composite string key
const KEY_MAX: &str = "\u{10ffff}";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Engine storage backed by redb
#[derive(Clone)]
pub struct EngineStore {
    db: Arc<Database>,
}

impl EngineStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (tests and tooling)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(VENDORS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_USER_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_VENDOR_TABLE)?;
            let _ = write_txn.open_table(PAYMENTS_TABLE)?;
            let _ = write_txn.open_table(PAYMENT_BY_ORDER_TABLE)?;
            let _ = write_txn.open_table(NOTIFICATIONS_TABLE)?;
            let _ = write_txn.open_table(CARTS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction (blocks until it is the sole writer)
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Products ==========

    /// Store a product (committed; catalog seeding and stock release)
    pub fn put_product(&self, product: &Product) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.put_product_txn(&txn, product)?;
        txn.commit()?;
        Ok(())
    }

    /// Store a product within a transaction
    pub fn put_product_txn(&self, txn: &WriteTransaction, product: &Product) -> StorageResult<()> {
        let mut table = txn.open_table(PRODUCTS_TABLE)?;
        let value = serde_json::to_vec(product)?;
        table.insert(product.id.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn get_product(&self, product_id: &str) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;
        match table.get(product_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Read a product within a write transaction (reservation path)
    pub fn get_product_txn(
        &self,
        txn: &WriteTransaction,
        product_id: &str,
    ) -> StorageResult<Option<Product>> {
        let table = txn.open_table(PRODUCTS_TABLE)?;
        match table.get(product_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Vendors ==========

    pub fn put_vendor(&self, vendor: &Vendor) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(VENDORS_TABLE)?;
            let value = serde_json::to_vec(vendor)?;
            table.insert(vendor.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_vendor(&self, vendor_id: &str) -> StorageResult<Option<Vendor>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VENDORS_TABLE)?;
        match table.get(vendor_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// All vendors (matching scans; directories stay small on one node)
    pub fn all_vendors(&self) -> StorageResult<Vec<Vendor>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VENDORS_TABLE)?;
        let mut vendors = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            vendors.push(serde_json::from_slice(value.value())?);
        }
        Ok(vendors)
    }

    // ========== Orders ==========

    /// Persist a new order together with both index entries, atomically
    pub fn insert_order(&self, order: &Order) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            self.put_order_txn(&txn, order)?;
            let mut by_user = txn.open_table(ORDERS_BY_USER_TABLE)?;
            by_user.insert((order.user_id.as_str(), order.id.as_str()), ())?;
            let mut by_vendor = txn.open_table(ORDERS_BY_VENDOR_TABLE)?;
            by_vendor.insert((order.vendor_id.as_str(), order.id.as_str()), ())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Store an order within a transaction (status/payment mutation)
    pub fn put_order_txn(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Orders for a user, newest first
    pub fn orders_for_user(&self, user_id: &str) -> StorageResult<Vec<Order>> {
        self.orders_by_index(ORDERS_BY_USER_TABLE, user_id)
    }

    /// Orders for a vendor, newest first
    pub fn orders_for_vendor(&self, vendor_id: &str) -> StorageResult<Vec<Order>> {
        self.orders_by_index(ORDERS_BY_VENDOR_TABLE, vendor_id)
    }

    fn orders_by_index(
        &self,
        index: TableDefinition<(&str, &str), ()>,
        owner_id: &str,
    ) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index_table = read_txn.open_table(index)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;

        let range_start = (owner_id, "");
        let range_end = (owner_id, KEY_MAX);

        let mut orders: Vec<Order> = Vec::new();
        for result in index_table.range(range_start..=range_end)? {
            let (key, _value) = result?;
            let order_id = key.value().1;
            if let Some(value) = orders_table.get(order_id)? {
                orders.push(serde_json::from_slice(value.value())?);
            }
        }

        orders.sort_by_key(|o| std::cmp::Reverse(o.created_at));
        Ok(orders)
    }

    // ========== Payments ==========

    pub fn get_payment(&self, payment_id: &str) -> StorageResult<Option<Payment>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENTS_TABLE)?;
        match table.get(payment_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_payment_txn(
        &self,
        txn: &WriteTransaction,
        payment_id: &str,
    ) -> StorageResult<Option<Payment>> {
        let table = txn.open_table(PAYMENTS_TABLE)?;
        match table.get(payment_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_payment_txn(&self, txn: &WriteTransaction, payment: &Payment) -> StorageResult<()> {
        let mut table = txn.open_table(PAYMENTS_TABLE)?;
        let value = serde_json::to_vec(payment)?;
        table.insert(payment.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Payment id for an order, if one exists
    pub fn payment_id_for_order(&self, order_id: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENT_BY_ORDER_TABLE)?;
        Ok(table.get(order_id)?.map(|guard| guard.value().to_string()))
    }

    /// Same check within a write transaction (duplicate-payment guard)
    pub fn payment_id_for_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<String>> {
        let table = txn.open_table(PAYMENT_BY_ORDER_TABLE)?;
        Ok(table.get(order_id)?.map(|guard| guard.value().to_string()))
    }

    /// Record the order→payment uniqueness index entry
    pub fn set_payment_index_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        payment_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PAYMENT_BY_ORDER_TABLE)?;
        table.insert(order_id, payment_id)?;
        Ok(())
    }

    // ========== Notifications ==========

    /// Append a notification (committed)
    pub fn insert_notification(&self, notification: &Notification) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            let value = serde_json::to_vec(notification)?;
            table.insert(notification.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Overwrite a notification (is_read flips)
    pub fn update_notification(&self, notification: &Notification) -> StorageResult<()> {
        self.insert_notification(notification)
    }

    pub fn get_notification(&self, id: &str) -> StorageResult<Option<Notification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn delete_notification(&self, id: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            table.remove(id)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// All notifications matching `filter`, unsorted
    pub fn notifications_where(
        &self,
        filter: impl Fn(&Notification) -> bool,
    ) -> StorageResult<Vec<Notification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS_TABLE)?;
        let mut matches = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let notification: Notification = serde_json::from_slice(value.value())?;
            if filter(&notification) {
                matches.push(notification);
            }
        }
        Ok(matches)
    }

    // ========== Carts ==========

    pub fn get_cart(&self, user_id: &str) -> StorageResult<Vec<CartLine>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CARTS_TABLE)?;
        match table.get(user_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(Vec::new()),
        }
    }

    pub fn set_cart(&self, user_id: &str, lines: &[CartLine]) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CARTS_TABLE)?;
            let value = serde_json::to_vec(lines)?;
            table.insert(user_id, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn clear_cart(&self, user_id: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CARTS_TABLE)?;
            table.remove(user_id)?;
        }
        txn.commit()?;
        Ok(())
    }
}
