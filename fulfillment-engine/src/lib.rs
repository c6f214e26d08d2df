//! Order Placement & Fulfillment Engine
//!
//! Turns a cart of line items into a committed order against shared,
//! concurrently-mutated inventory, matches the requester to a capable
//! vendor, computes delivery economics and drives the order through a
//! bounded lifecycle while keeping payment state synchronized.
//!
//! # Module structure
//!
//! ```text
//! fulfillment-engine/src/
//! ├── core/          # Configuration, error taxonomy, logging setup
//! ├── storage.rs     # redb store: tables, indexes, transactions
//! ├── geo.rs         # Distance, deliverability, fee, ETA (pure)
//! ├── money.rs       # Decimal-safe monetary arithmetic
//! ├── inventory.rs   # Atomic stock reservation / release
//! ├── orders/        # Placement workflow, lifecycle, queries
//! ├── payments.rs    # Payment ledger and reconciliation
//! ├── matching.rs    # Radius vendor matching
//! └── notify.rs      # Notification sink and owner surface
//! ```
//!
//! # Consistency
//!
//! The store is a single redb database; write transactions are serialized,
//! which makes the stock decrement a true atomic conditional update. Orders
//! are created only after every item's stock is reserved; a reservation
//! failure mid-list releases everything reserved so far before returning.
//! Notification emission and cart clearing sit outside the consistency
//! boundary and never fail a committed order.

pub mod core;
pub mod geo;
pub mod inventory;
pub mod matching;
pub mod money;
pub mod notify;
pub mod orders;
pub mod payments;
pub mod storage;

// Re-export public types
pub use crate::core::{EngineConfig, EngineError, EngineResult, init_logging};
pub use inventory::{InventoryLedger, ReserveOutcome};
pub use matching::{VendorMatch, VendorMatcher};
pub use notify::{NotificationService, NotificationSink, StoreNotificationSink};
pub use orders::{OrderService, OrderView, PlaceOrderRequest};
pub use payments::PaymentLedger;
pub use storage::EngineStore;
