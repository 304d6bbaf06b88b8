//! redb-based storage layer for orders
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | JSON `Order` | Order records |
//! | `counters` | name | `u64` | Monotonic id allocation |
//!
//! # Durability
//!
//! redb commits are durable as soon as `commit()` returns (copy-on-write with
//! atomic pointer swap), so a crash never leaves the database inconsistent.
//!
//! # Concurrency
//!
//! redb serializes write transactions, which gives per-record atomicity.
//! Near-simultaneous status updates resolve last-write-wins; order ids come
//! from a counter row incremented inside the create transaction, so
//! concurrent creates can never collide.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use thiserror::Error;

use shared::models::order::{LineItem, Order, OrderStatus, PaymentMethod};
use shared::util::now_millis;

/// Table for order records: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for counters: key = counter name, value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const ORDER_SEQ_KEY: &str = "order_seq";

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

/// Fields supplied by the ordering flow; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub owner_id: Option<String>,
    pub line_items: Vec<LineItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
}

/// Persistence contract for orders.
///
/// Not-found is a value (`Ok(None)` / `Ok(false)`), never an error: the
/// caller decides whether an absent id is a 404 or a no-op.
pub trait OrderStore: Send + Sync {
    /// Persist a new order in `pending` state, assigning a unique id and
    /// initializing both timestamps.
    fn create(&self, new_order: NewOrder) -> StorageResult<Order>;

    fn get(&self, id: &str) -> StorageResult<Option<Order>>;

    fn list_all(&self) -> StorageResult<Vec<Order>>;

    fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Order>>;

    fn list_by_status(&self, status: OrderStatus) -> StorageResult<Vec<Order>>;

    /// Set the status and refresh `updated_at`. Returns the updated order,
    /// or `None` when the id is unknown.
    fn update_status(&self, id: &str, status: OrderStatus) -> StorageResult<Option<Order>>;

    /// Permanently remove an order, bypassing the lifecycle state machine.
    /// Returns whether the record existed.
    fn hard_delete(&self, id: &str) -> StorageResult<bool>;
}

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl OrderStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(Arc::new(db))
    }

    /// Open an in-memory database (tests and demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(Arc::new(db))
    }

    fn init(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(ORDER_SEQ_KEY)?.is_none() {
                counters.insert(ORDER_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Shared database handle (audit log and settings open their own tables)
    pub fn database(&self) -> Arc<Database> {
        self.db.clone()
    }

    fn scan<F>(&self, mut keep: F) -> StorageResult<Vec<Order>>
    where
        F: FnMut(&Order) -> bool,
    {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if keep(&order) {
                orders.push(order);
            }
        }

        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }
}

impl OrderStore for OrderStorage {
    fn create(&self, new_order: NewOrder) -> StorageResult<Order> {
        let txn = self.db.begin_write()?;
        let order = {
            let mut counters = txn.open_table(COUNTERS_TABLE)?;
            let next = counters.get(ORDER_SEQ_KEY)?.map(|g| g.value()).unwrap_or(0) + 1;
            counters.insert(ORDER_SEQ_KEY, next)?;
            drop(counters);

            let now = now_millis();
            let order = Order {
                id: format!("order-{}", next),
                owner_id: new_order.owner_id,
                line_items: new_order.line_items,
                subtotal: new_order.subtotal,
                delivery_fee: new_order.delivery_fee,
                total: new_order.total,
                status: OrderStatus::Pending,
                payment_method: new_order.payment_method,
                delivery_address: new_order.delivery_address,
                created_at: now,
                updated_at: now,
            };

            let mut table = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(&order)?;
            table.insert(order.id.as_str(), value.as_slice())?;
            order
        };
        txn.commit()?;
        Ok(order)
    }

    fn get(&self, id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(id)? {
            Some(value) => {
                let order: Order = serde_json::from_slice(value.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    fn list_all(&self) -> StorageResult<Vec<Order>> {
        self.scan(|_| true)
    }

    fn list_by_owner(&self, owner_id: &str) -> StorageResult<Vec<Order>> {
        self.scan(|o| o.owner_id.as_deref() == Some(owner_id))
    }

    fn list_by_status(&self, status: OrderStatus) -> StorageResult<Vec<Order>> {
        self.scan(|o| o.status == status)
    }

    fn update_status(&self, id: &str, status: OrderStatus) -> StorageResult<Option<Order>> {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut table = txn.open_table(ORDERS_TABLE)?;

            // Read and clone first to avoid borrow conflict with insert
            let existing = table.get(id)?.map(|g| g.value().to_vec());

            match existing {
                Some(bytes) => {
                    let mut order: Order = serde_json::from_slice(&bytes)?;
                    order.status = status;
                    order.updated_at = now_millis();
                    let value = serde_json::to_vec(&order)?;
                    table.insert(id, value.as_slice())?;
                    Some(order)
                }
                None => None,
            }
        };
        txn.commit()?;
        Ok(updated)
    }

    fn hard_delete(&self, id: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            table.remove(id)?.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order(owner: Option<&str>) -> NewOrder {
        NewOrder {
            owner_id: owner.map(|s| s.to_string()),
            line_items: vec![LineItem {
                id: "margherita".to_string(),
                name: "Margherita".to_string(),
                unit_price: 8.5,
                quantity: 1,
                special_instructions: None,
                image_url: None,
            }],
            subtotal: 8.5,
            delivery_fee: 3.99,
            total: 12.49,
            payment_method: PaymentMethod::Cash,
            delivery_address: "Via Roma 1".to_string(),
        }
    }

    #[test]
    fn test_create_assigns_unique_ids_and_pending_status() {
        let storage = OrderStorage::open_in_memory().unwrap();

        let a = storage.create(new_order(Some("u1"))).unwrap();
        let b = storage.create(new_order(Some("u1"))).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.id, "order-1");
        assert_eq!(b.id, "order-2");
        assert_eq!(a.status, OrderStatus::Pending);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_get_unknown_id_returns_none() {
        let storage = OrderStorage::open_in_memory().unwrap();
        assert!(storage.get("order-404").unwrap().is_none());
    }

    #[test]
    fn test_update_status_refreshes_updated_at() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = storage.create(new_order(Some("u1"))).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));

        let updated = storage
            .update_status(&order.id, OrderStatus::Preparing)
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);
        assert_eq!(updated.created_at, order.created_at);
        assert!(updated.updated_at > order.updated_at);
    }

    #[test]
    fn test_update_status_unknown_id_returns_none() {
        let storage = OrderStorage::open_in_memory().unwrap();
        assert!(storage
            .update_status("order-404", OrderStatus::Preparing)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_list_by_owner_isolates_customers() {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage.create(new_order(Some("alice"))).unwrap();
        storage.create(new_order(Some("bob"))).unwrap();
        storage.create(new_order(None)).unwrap(); // guest order

        let alice = storage.list_by_owner("alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].owner_id.as_deref(), Some("alice"));

        // Guest orders belong to no owner
        assert!(storage.list_by_owner("").unwrap().is_empty());
        assert_eq!(storage.list_all().unwrap().len(), 3);
    }

    #[test]
    fn test_list_by_status() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let a = storage.create(new_order(Some("u1"))).unwrap();
        storage.create(new_order(Some("u1"))).unwrap();

        storage
            .update_status(&a.id, OrderStatus::Preparing)
            .unwrap();

        let preparing = storage.list_by_status(OrderStatus::Preparing).unwrap();
        assert_eq!(preparing.len(), 1);
        assert_eq!(preparing[0].id, a.id);
        assert_eq!(
            storage.list_by_status(OrderStatus::Pending).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_hard_delete() {
        let storage = OrderStorage::open_in_memory().unwrap();
        let order = storage.create(new_order(Some("u1"))).unwrap();

        assert!(storage.hard_delete(&order.id).unwrap());
        assert!(storage.get(&order.id).unwrap().is_none());
        // Second delete reports absence
        assert!(!storage.hard_delete(&order.id).unwrap());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.redb");

        let id = {
            let storage = OrderStorage::open(&path).unwrap();
            storage.create(new_order(Some("u1"))).unwrap().id
        };

        let storage = OrderStorage::open(&path).unwrap();
        let order = storage.get(&id).unwrap().unwrap();
        assert_eq!(order.id, id);

        // Counter survives reopen: no id reuse
        let next = storage.create(new_order(Some("u1"))).unwrap();
        assert_ne!(next.id, id);
    }
}
