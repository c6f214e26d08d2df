//! Shared domain types for the fulfillment engine
//!
//! Entities persisted by the engine (products, vendors, orders, payments,
//! notifications, cart lines) plus the order status state machine and small
//! time utilities. This crate stays behavior-free: every rule that touches
//! storage or more than one entity lives in `fulfillment-engine`.

pub mod models;
pub mod util;

// Re-exports
pub use models::{
    CartLine, DayHours, DeliveryAddress, DeliverySettings, GeoPoint, Notification,
    NotificationKind, Order, OrderItem, OrderStatus, OrderType, Payment, PaymentMethod,
    PaymentState, PaymentStatus, Product, ScheduleDetails, ServiceTypes, Vendor, Weekday,
};
pub use serde::{Deserialize, Serialize};
