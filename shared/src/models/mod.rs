//! Persisted domain entities
//!
//! One file per aggregate, mirroring the storage tables:
//!
//! - **product**: catalog item with a stock counter
//! - **vendor**: read-only vendor record (location, service policy, hours)
//! - **order**: order aggregate with line-item snapshots and status axes
//! - **payment**: one payment per order
//! - **notification**: append-only event record for a user or a vendor
//! - **cart**: per-user cart lines (workflow input, cleared best-effort)

pub mod cart;
pub mod notification;
pub mod order;
pub mod payment;
pub mod product;
pub mod vendor;

pub use cart::CartLine;
pub use notification::{Notification, NotificationKind};
pub use order::{
    DeliveryAddress, Order, OrderItem, OrderStatus, OrderType, PaymentStatus, ScheduleDetails,
};
pub use payment::{Payment, PaymentMethod, PaymentState};
pub use product::Product;
pub use vendor::{DayHours, DeliverySettings, GeoPoint, ServiceTypes, Vendor, Weekday};
