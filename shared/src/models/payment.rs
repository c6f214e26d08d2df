//! Payment Model

use serde::{Deserialize, Serialize};

/// Settlement method
///
/// Only cash-on-fulfillment exists today; any future method integrates
/// through the same ledger reconciliation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "COD")]
    Cod,
}

/// Payment record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Success,
    Failed,
}

/// One payment per order (`order_id` is unique in storage)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Copied from the order total at creation, never re-entered
    pub amount: f64,
    pub status: PaymentState,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_serializes_as_cod() {
        let json = serde_json::to_string(&PaymentMethod::Cod).unwrap();
        assert_eq!(json, "\"COD\"");
    }
}
