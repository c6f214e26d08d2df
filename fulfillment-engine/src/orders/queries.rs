//! Owner-authorized order reads

use super::{OrderService, OrderView};
use crate::core::{EngineError, EngineResult};

impl OrderService {
    /// Fetch one order; readable by its user or its vendor only
    pub fn get_order(&self, order_id: &str, requester_id: &str) -> EngineResult<OrderView> {
        let Some(order) = self.store.get_order(order_id)? else {
            return Err(EngineError::NotFound(format!("order {order_id}")));
        };
        if order.user_id != requester_id && order.vendor_id != requester_id {
            return Err(EngineError::Unauthorized);
        }
        let vendor = self.store.get_vendor(&order.vendor_id)?;
        Ok(OrderView::project(order, vendor.as_ref()))
    }

    /// A user's orders, newest first; users see only their own
    pub fn list_orders_for_user(
        &self,
        user_id: &str,
        requester_id: &str,
    ) -> EngineResult<Vec<OrderView>> {
        if user_id != requester_id {
            return Err(EngineError::Unauthorized);
        }
        let orders = self.store.orders_for_user(user_id)?;
        self.project_all(orders)
    }

    /// A vendor's orders, newest first; vendors see only their own
    pub fn list_orders_for_vendor(
        &self,
        vendor_id: &str,
        requester_id: &str,
    ) -> EngineResult<Vec<OrderView>> {
        if vendor_id != requester_id {
            return Err(EngineError::Unauthorized);
        }
        let orders = self.store.orders_for_vendor(vendor_id)?;
        self.project_all(orders)
    }

    fn project_all(&self, orders: Vec<shared::Order>) -> EngineResult<Vec<OrderView>> {
        orders
            .into_iter()
            .map(|order| {
                let vendor = self.store.get_vendor(&order.vendor_id)?;
                Ok(OrderView::project(order, vendor.as_ref()))
            })
            .collect()
    }
}
