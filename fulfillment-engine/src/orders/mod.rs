//! Order placement workflow, lifecycle manager and read surface
//!
//! - **placement**: the one place an order is created. Validates the
//!   request, reserves stock per item (releasing everything already
//!   reserved if any item fails), snapshots prices, persists the order,
//!   then runs the best-effort side effects (notifications, cart clear).
//! - **lifecycle**: vendor-authorized status transitions over the state
//!   machine defined in `shared::OrderStatus`.
//! - **queries**: owner-authorized reads returning `OrderView` projections.

pub mod lifecycle;
pub mod placement;
pub mod queries;
pub mod view;

pub use placement::PlaceOrderRequest;
pub use view::OrderView;

use crate::inventory::InventoryLedger;
use crate::notify::NotificationSink;
use crate::storage::EngineStore;
use std::sync::Arc;

/// Order placement, lifecycle and query service
#[derive(Clone)]
pub struct OrderService {
    store: EngineStore,
    inventory: InventoryLedger,
    sink: Arc<dyn NotificationSink>,
}

impl OrderService {
    pub fn new(store: EngineStore, sink: Arc<dyn NotificationSink>) -> Self {
        let inventory = InventoryLedger::new(store.clone());
        Self {
            store,
            inventory,
            sink,
        }
    }
}
