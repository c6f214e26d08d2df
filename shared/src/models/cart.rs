//! Cart Model

use serde::{Deserialize, Serialize};

/// One cart entry: a product reference and a quantity of at least 1
///
/// Carts are owned by the requesting identity and sit outside the order's
/// consistency boundary; the placement workflow reads them as input and
/// clears them best-effort afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}
