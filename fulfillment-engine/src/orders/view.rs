//! Read-side order projection

use serde::Serialize;
use shared::{Order, Vendor};

/// Order plus denormalized vendor display fields
///
/// A convenience projection for callers rendering the order; not part of
/// the write contract and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub vendor_name: Option<String>,
    pub vendor_phone: Option<String>,
}

impl OrderView {
    pub fn project(order: Order, vendor: Option<&Vendor>) -> Self {
        Self {
            order,
            vendor_name: vendor.map(|v| v.name.clone()),
            vendor_phone: vendor.and_then(|v| v.phone.clone()),
        }
    }
}
