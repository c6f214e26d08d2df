//! Order lifecycle manager
//!
//! Applies vendor-authorized status transitions after placement. The legal
//! transition set lives on `shared::OrderStatus`; this module re-checks it
//! inside the write transaction so two racing transitions cannot both
//! apply. `payment_status` is out of bounds here — it moves only through
//! the payment ledger's reconciliation path.

use super::{OrderService, OrderView};
use crate::core::{EngineError, EngineResult};
use crate::notify::emit_best_effort;
use shared::{Notification, NotificationKind, Order, OrderStatus};

impl OrderService {
    /// Apply a status transition on behalf of the order's owning vendor
    pub async fn update_status(
        &self,
        order_id: &str,
        vendor_id: &str,
        new_status: OrderStatus,
    ) -> EngineResult<OrderView> {
        let order = self.apply_transition(order_id, vendor_id, new_status)?;

        emit_best_effort(
            self.sink.as_ref(),
            Notification::for_user(
                &order.user_id,
                "Order Status Updated",
                format!("Your order #{} is now {}.", order.id, new_status.label()),
                NotificationKind::OrderUpdate,
            ),
        )
        .await;

        let vendor = self.store.get_vendor(&order.vendor_id)?;
        Ok(OrderView::project(order, vendor.as_ref()))
    }

    /// Authorization + state machine check + write, in one transaction
    fn apply_transition(
        &self,
        order_id: &str,
        vendor_id: &str,
        new_status: OrderStatus,
    ) -> EngineResult<Order> {
        let txn = self.store.begin_write()?;

        let Some(mut order) = self.store.get_order_txn(&txn, order_id)? else {
            return Err(EngineError::NotFound(format!("order {order_id}")));
        };
        if order.vendor_id != vendor_id {
            return Err(EngineError::Unauthorized);
        }
        if !order.status.can_transition_to(new_status) {
            return Err(EngineError::Conflict(format!(
                "illegal status transition {} -> {}",
                order.status.label(),
                new_status.label()
            )));
        }

        order.status = new_status;
        order.updated_at = shared::util::now_millis();
        self.store.put_order_txn(&txn, &order)?;
        txn.commit()?;

        tracing::info!(
            order_id = %order.id,
            vendor_id = %vendor_id,
            status = new_status.label(),
            "Order status updated"
        );
        Ok(order)
    }
}
