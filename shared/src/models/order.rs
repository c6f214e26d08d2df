//! Order Model
//!
//! The order aggregate: immutable line-item snapshots, a five-state
//! fulfillment status axis and a separate payment status axis.
//!
//! # Status state machine
//!
//! ```text
//! pending ──► confirmed ──► dispatched ──► delivered
//!    │            │
//!    └────────────┴──► cancelled
//! ```
//!
//! `delivered` and `cancelled` are terminal; no transition leaves them.

use super::GeoPoint;
use serde::{Deserialize, Serialize};

/// How the order is fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Delivery,
    Takeaway,
}

/// Fulfillment status axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether a transition to `next` is legal
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Dispatched)
                | (Dispatched, Delivered)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Lowercase label used in notification messages
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Payment status axis, reconciled only through the payment ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// Immutable line-item snapshot captured at placement time
///
/// Name and price are copies of the catalog values at reservation time and
/// never change afterwards, even if the catalog does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    /// Unit price at placement time
    pub price: f64,
    pub quantity: u32,
}

/// Delivery destination, required iff `order_type == Delivery`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub location: GeoPoint,
}

/// Optional scheduling block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDetails {
    pub is_scheduled: bool,
    /// Millisecond timestamp, strictly future at creation when scheduled
    pub scheduled_for: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Order aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub vendor_id: String,
    pub order_type: OrderType,
    pub items: Vec<OrderItem>,
    /// Recomputed from item snapshots at placement, never caller-supplied
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleDetails>,
    pub created_at: i64,
    pub updated_at: i64,
}
