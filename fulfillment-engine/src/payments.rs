//! Payment ledger and order reconciliation
//!
//! One payment per order, enforced by the `payment_by_order` index checked
//! and written inside the same transaction that stores the payment. COD
//! settlement flips the payment to `success` and the order to `paid` in
//! that one transaction — no read can ever observe the two disagreeing.

use crate::core::{EngineError, EngineResult};
use crate::notify::{NotificationSink, emit_best_effort};
use crate::storage::EngineStore;
use shared::{
    Notification, NotificationKind, Payment, PaymentMethod, PaymentState, PaymentStatus,
};
use std::sync::Arc;

/// Payment creation and reconciliation service
#[derive(Clone)]
pub struct PaymentLedger {
    store: EngineStore,
    sink: Arc<dyn NotificationSink>,
}

impl PaymentLedger {
    pub fn new(store: EngineStore, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// Create the payment for an order
    ///
    /// The amount is copied from the order total, never re-entered. For COD
    /// the payment settles immediately and the order's payment status moves
    /// to `paid` within the same transaction.
    pub async fn create_payment(
        &self,
        order_id: &str,
        user_id: &str,
        method: PaymentMethod,
    ) -> EngineResult<Payment> {
        let (payment, settled_user) = {
            let txn = self.store.begin_write()?;

            let Some(mut order) = self.store.get_order_txn(&txn, order_id)? else {
                return Err(EngineError::NotFound(format!("order {order_id}")));
            };
            if order.user_id != user_id {
                return Err(EngineError::Unauthorized);
            }
            if self.store.payment_id_for_order_txn(&txn, order_id)?.is_some() {
                return Err(EngineError::Conflict(format!(
                    "payment already exists for order {order_id}"
                )));
            }

            let mut payment = Payment {
                id: shared::util::new_id(),
                order_id: order_id.to_string(),
                method,
                transaction_id: None,
                amount: order.total_amount,
                status: PaymentState::Pending,
                created_at: shared::util::now_millis(),
            };

            // Cash on fulfillment settles at creation
            let settled_user = if method == PaymentMethod::Cod {
                payment.status = PaymentState::Success;
                order.payment_status = PaymentStatus::Paid;
                order.updated_at = shared::util::now_millis();
                self.store.put_order_txn(&txn, &order)?;
                Some(order.user_id.clone())
            } else {
                None
            };

            self.store.put_payment_txn(&txn, &payment)?;
            self.store.set_payment_index_txn(&txn, order_id, &payment.id)?;
            txn.commit()?;

            (payment, settled_user)
        };

        tracing::info!(
            payment_id = %payment.id,
            order_id = %order_id,
            amount = payment.amount,
            status = ?payment.status,
            "Payment created"
        );

        if let Some(user) = settled_user {
            emit_best_effort(
                self.sink.as_ref(),
                Notification::for_user(
                    user,
                    "Payment Confirmed",
                    format!("Payment for order #{order_id} is confirmed. Payment method: COD"),
                    NotificationKind::OrderUpdate,
                ),
            )
            .await;
        }

        Ok(payment)
    }

    /// Settle or fail an existing payment, mirroring the order
    ///
    /// The sole integration path for any future non-COD method. Only
    /// `success` and `failed` are accepted targets.
    pub async fn update_payment_status(
        &self,
        payment_id: &str,
        new_state: PaymentState,
    ) -> EngineResult<Payment> {
        if new_state == PaymentState::Pending {
            return Err(EngineError::Validation(
                "payment status can only move to success or failed".to_string(),
            ));
        }

        let (payment, order_user) = {
            let txn = self.store.begin_write()?;

            let Some(mut payment) = self.store.get_payment_txn(&txn, payment_id)? else {
                return Err(EngineError::NotFound(format!("payment {payment_id}")));
            };
            payment.status = new_state;
            self.store.put_payment_txn(&txn, &payment)?;

            // Mirror onto the order in the same transaction
            let order_user = match self.store.get_order_txn(&txn, &payment.order_id)? {
                Some(mut order) => {
                    order.payment_status = match new_state {
                        PaymentState::Success => PaymentStatus::Paid,
                        _ => PaymentStatus::Failed,
                    };
                    order.updated_at = shared::util::now_millis();
                    self.store.put_order_txn(&txn, &order)?;
                    Some(order.user_id)
                }
                None => None,
            };

            txn.commit()?;
            (payment, order_user)
        };

        tracing::info!(
            payment_id = %payment.id,
            order_id = %payment.order_id,
            status = ?payment.status,
            "Payment status updated"
        );

        if let Some(user) = order_user {
            let label = match new_state {
                PaymentState::Success => "success",
                _ => "failed",
            };
            emit_best_effort(
                self.sink.as_ref(),
                Notification::for_user(
                    user,
                    "Payment Status Updated",
                    format!("Payment for order #{} is {label}.", payment.order_id),
                    NotificationKind::OrderUpdate,
                ),
            )
            .await;
        }

        Ok(payment)
    }

    /// The payment attached to an order; readable by its user or vendor
    pub fn payment_for_order(&self, order_id: &str, requester_id: &str) -> EngineResult<Payment> {
        let Some(order) = self.store.get_order(order_id)? else {
            return Err(EngineError::NotFound(format!("order {order_id}")));
        };
        if order.user_id != requester_id && order.vendor_id != requester_id {
            return Err(EngineError::Unauthorized);
        }
        let Some(payment_id) = self.store.payment_id_for_order(order_id)? else {
            return Err(EngineError::NotFound(format!(
                "payment for order {order_id}"
            )));
        };
        let Some(payment) = self.store.get_payment(&payment_id)? else {
            return Err(EngineError::NotFound(format!("payment {payment_id}")));
        };
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::StoreNotificationSink;
    use shared::{Order, OrderItem, OrderStatus, OrderType};

    fn test_order(id: &str, user_id: &str, total: f64) -> Order {
        let now = shared::util::now_millis();
        Order {
            id: id.to_string(),
            user_id: user_id.to_string(),
            vendor_id: "vendor-1".to_string(),
            order_type: OrderType::Takeaway,
            items: vec![OrderItem {
                product_id: "product-1".to_string(),
                name: "Apples".to_string(),
                price: total,
                quantity: 1,
            }],
            total_amount: total,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            delivery_address: None,
            schedule: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn ledger_with_order(total: f64) -> (EngineStore, PaymentLedger) {
        let store = EngineStore::open_in_memory().unwrap();
        store.insert_order(&test_order("order-1", "user-1", total)).unwrap();
        let sink = Arc::new(StoreNotificationSink::new(store.clone()));
        let ledger = PaymentLedger::new(store.clone(), sink);
        (store, ledger)
    }

    #[tokio::test]
    async fn test_cod_settles_payment_and_order_together() {
        let (store, ledger) = ledger_with_order(250.0);

        let payment = ledger
            .create_payment("order-1", "user-1", PaymentMethod::Cod)
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentState::Success);
        assert_eq!(payment.amount, 250.0);

        let order = store.get_order("order-1").unwrap().unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Paid);
    }

    #[tokio::test]
    async fn test_duplicate_payment_rejected() {
        let (_store, ledger) = ledger_with_order(100.0);

        ledger
            .create_payment("order-1", "user-1", PaymentMethod::Cod)
            .await
            .unwrap();
        let err = ledger
            .create_payment("order-1", "user-1", PaymentMethod::Cod)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_only_order_owner_may_pay() {
        let (_store, ledger) = ledger_with_order(100.0);

        let err = ledger
            .create_payment("order-1", "user-2", PaymentMethod::Cod)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized));
    }

    #[tokio::test]
    async fn test_missing_order_rejected() {
        let (_store, ledger) = ledger_with_order(100.0);

        let err = ledger
            .create_payment("order-404", "user-1", PaymentMethod::Cod)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_status_mirrors_order() {
        let (store, ledger) = ledger_with_order(100.0);
        let payment = ledger
            .create_payment("order-1", "user-1", PaymentMethod::Cod)
            .await
            .unwrap();

        let failed = ledger
            .update_payment_status(&payment.id, PaymentState::Failed)
            .await
            .unwrap();
        assert_eq!(failed.status, PaymentState::Failed);
        assert_eq!(
            store.get_order("order-1").unwrap().unwrap().payment_status,
            PaymentStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_update_to_pending_is_invalid() {
        let (_store, ledger) = ledger_with_order(100.0);
        let payment = ledger
            .create_payment("order-1", "user-1", PaymentMethod::Cod)
            .await
            .unwrap();

        let err = ledger
            .update_payment_status(&payment.id, PaymentState::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_payment_for_order_authorization() {
        let (_store, ledger) = ledger_with_order(100.0);
        ledger
            .create_payment("order-1", "user-1", PaymentMethod::Cod)
            .await
            .unwrap();

        // User and vendor may read
        assert!(ledger.payment_for_order("order-1", "user-1").is_ok());
        assert!(ledger.payment_for_order("order-1", "vendor-1").is_ok());
        // A stranger may not
        assert!(matches!(
            ledger.payment_for_order("order-1", "user-9"),
            Err(EngineError::Unauthorized)
        ));
    }
}
