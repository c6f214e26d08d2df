//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog product owned by a vendor
///
/// `stock` is a pure capacity counter: the engine's inventory ledger is the
/// only writer, and the `u32` type plus the conditional decrement keep it
/// from ever going negative. Inactive products are not purchasable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Owning vendor reference (String ID)
    pub vendor_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Unit price, non-negative
    pub price: f64,
    /// Available stock
    pub stock: u32,
    /// Sales unit, e.g. "kg", "piece"
    pub unit: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn new(
        vendor_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        stock: u32,
        unit: impl Into<String>,
    ) -> Self {
        let now = crate::util::now_millis();
        Self {
            id: crate::util::new_id(),
            vendor_id: vendor_id.into(),
            name: name.into(),
            description: None,
            price,
            stock,
            unit: unit.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
