//! Order placement workflow
//!
//! Write ordering is the consistency mechanism: stock is reserved for every
//! item first, the order is created only after all reservations succeed,
//! and any failure between the first reservation and the order commit
//! releases every reservation made by this call before the error returns.
//! Side effects after the commit (notifications, cart clearing) are
//! best-effort and can never roll the order back.

use super::{OrderService, OrderView};
use crate::core::{EngineError, EngineResult};
use crate::inventory::ReserveOutcome;
use crate::money;
use crate::notify::emit_best_effort;
use chrono::{DateTime, Utc};
use shared::{
    CartLine, DeliveryAddress, Notification, NotificationKind, Order, OrderItem, OrderStatus,
    OrderType, PaymentStatus, ScheduleDetails, Vendor,
};

/// Placement command
///
/// Field optionality mirrors the contract: `delivery_address` is required
/// iff `order_type` is delivery, `schedule` is absent for immediate orders.
#[derive(Debug, Clone)]
pub struct PlaceOrderRequest {
    pub user_id: String,
    pub vendor_id: String,
    pub order_type: OrderType,
    pub items: Vec<CartLine>,
    pub delivery_address: Option<DeliveryAddress>,
    pub schedule: Option<ScheduleDetails>,
}

impl OrderService {
    /// Execute the placement workflow
    pub async fn place_order(&self, request: PlaceOrderRequest) -> EngineResult<OrderView> {
        let vendor = self.validate_request(&request)?;

        // Reserve stock per item, in request order. The first failure
        // releases everything reserved so far and aborts the placement.
        let mut reserved: Vec<(String, u32)> = Vec::new();
        let mut items: Vec<OrderItem> = Vec::new();
        for line in &request.items {
            let outcome = match self.inventory.reserve(&line.product_id, line.quantity) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.release_all(&reserved);
                    return Err(e.into());
                }
            };
            match outcome {
                ReserveOutcome::Reserved(product) => {
                    reserved.push((line.product_id.clone(), line.quantity));
                    items.push(OrderItem {
                        product_id: product.id,
                        name: product.name,
                        price: product.price,
                        quantity: line.quantity,
                    });
                }
                ReserveOutcome::InsufficientStock { available } => {
                    self.release_all(&reserved);
                    return Err(EngineError::Conflict(format!(
                        "insufficient stock for product {}: {} available, {} requested",
                        line.product_id, available, line.quantity
                    )));
                }
                ReserveOutcome::NotFound => {
                    self.release_all(&reserved);
                    return Err(EngineError::NotFound(format!(
                        "product {}",
                        line.product_id
                    )));
                }
                ReserveOutcome::Inactive => {
                    self.release_all(&reserved);
                    return Err(EngineError::Conflict(format!(
                        "product {} is not available",
                        line.product_id
                    )));
                }
            }
        }

        // Total is recomputed from the snapshots, never trusted from input
        let total_amount = money::order_total(&items);
        let now = shared::util::now_millis();
        let order = Order {
            id: shared::util::new_id(),
            user_id: request.user_id.clone(),
            vendor_id: request.vendor_id.clone(),
            order_type: request.order_type,
            items,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            delivery_address: request.delivery_address,
            schedule: request.schedule,
            created_at: now,
            updated_at: now,
        };

        // All reservations are held; commit the order. A storage failure
        // here still compensates before returning.
        if let Err(e) = self.store.insert_order(&order) {
            self.release_all(&reserved);
            return Err(e.into());
        }

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            vendor_id = %order.vendor_id,
            total = order.total_amount,
            "Order placed"
        );

        self.emit_placement_notifications(&order).await;

        if let Err(e) = self.store.clear_cart(&order.user_id) {
            tracing::warn!(user_id = %order.user_id, error = %e, "Cart clear failed, order stands");
        }

        Ok(OrderView::project(order, Some(&vendor)))
    }

    /// Steps 1-3: item list, vendor capability, address, schedule
    fn validate_request(&self, request: &PlaceOrderRequest) -> EngineResult<Vendor> {
        if request.items.is_empty() {
            return Err(EngineError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }
        if let Some(line) = request.items.iter().find(|l| l.quantity == 0) {
            return Err(EngineError::Validation(format!(
                "quantity for product {} must be at least 1",
                line.product_id
            )));
        }
        if let Some(line) = request
            .items
            .iter()
            .find(|l| l.quantity > money::MAX_QUANTITY)
        {
            return Err(EngineError::Validation(format!(
                "quantity for product {} exceeds the per-line limit of {}",
                line.product_id,
                money::MAX_QUANTITY
            )));
        }

        let Some(vendor) = self.store.get_vendor(&request.vendor_id)? else {
            return Err(EngineError::NotFound(format!(
                "vendor {}",
                request.vendor_id
            )));
        };
        if !vendor.is_active {
            return Err(EngineError::Conflict(format!(
                "vendor {} is not accepting orders",
                vendor.id
            )));
        }
        if !vendor.supports(request.order_type) {
            let wanted = match request.order_type {
                OrderType::Delivery => "delivery",
                OrderType::Takeaway => "takeaway",
            };
            return Err(EngineError::Validation(format!(
                "vendor {} does not offer {wanted} service",
                vendor.id
            )));
        }

        if request.order_type == OrderType::Delivery {
            match &request.delivery_address {
                None => {
                    return Err(EngineError::Validation(
                        "delivery orders require a delivery address".to_string(),
                    ));
                }
                Some(address) if !address.location.is_valid() => {
                    return Err(EngineError::Validation(
                        "delivery address has invalid coordinates".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }

        if let Some(schedule) = &request.schedule {
            if schedule.is_scheduled {
                self.validate_schedule(schedule, &vendor)?;
            }
        }

        Ok(vendor)
    }

    fn validate_schedule(&self, schedule: &ScheduleDetails, vendor: &Vendor) -> EngineResult<()> {
        let Some(scheduled_for) = schedule.scheduled_for else {
            return Err(EngineError::Validation(
                "scheduled orders require a scheduled time".to_string(),
            ));
        };
        if scheduled_for <= shared::util::now_millis() {
            return Err(EngineError::Validation(
                "scheduled time must be in the future".to_string(),
            ));
        }
        let Some(when) = DateTime::<Utc>::from_timestamp_millis(scheduled_for) else {
            return Err(EngineError::Validation(
                "scheduled time is out of range".to_string(),
            ));
        };
        if !vendor.is_open_at(when) {
            return Err(EngineError::Validation(format!(
                "vendor {} is closed at the scheduled time",
                vendor.id
            )));
        }
        Ok(())
    }

    /// Compensating release of every reservation made by this call
    fn release_all(&self, reserved: &[(String, u32)]) {
        for (product_id, quantity) in reserved {
            if let Err(e) = self.inventory.release(product_id, *quantity) {
                // The reservation could not be reversed; this needs operator
                // attention, but the caller still gets the original error.
                tracing::error!(
                    product_id = %product_id,
                    quantity,
                    error = %e,
                    "Compensating stock release failed"
                );
            }
        }
    }

    async fn emit_placement_notifications(&self, order: &Order) {
        let schedule_note = order
            .schedule
            .as_ref()
            .filter(|s| s.is_scheduled)
            .and_then(|s| s.scheduled_for)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|when| format!(" Scheduled for {}.", when.to_rfc3339()))
            .unwrap_or_default();

        emit_best_effort(
            self.sink.as_ref(),
            Notification::for_user(
                &order.user_id,
                "Order Placed",
                format!(
                    "Your order #{} has been placed successfully.{}",
                    order.id, schedule_note
                ),
                NotificationKind::OrderUpdate,
            ),
        )
        .await;

        emit_best_effort(
            self.sink.as_ref(),
            Notification::for_vendor(
                &order.vendor_id,
                "New Order",
                format!(
                    "You have received a new order #{}.{}",
                    order.id, schedule_note
                ),
                NotificationKind::OrderUpdate,
            ),
        )
        .await;
    }
}
