//! Notification sink and owner-facing notification surface
//!
//! The sink is the seam to whatever actually delivers notifications
//! (push/email/SMS transports are external collaborators). The engine only
//! ever calls it fire-and-forget: a sink failure is logged and swallowed,
//! never surfaced to the caller of a committed workflow.

use crate::core::{EngineConfig, EngineError, EngineResult};
use crate::storage::EngineStore;
use async_trait::async_trait;
use shared::Notification;

/// Delivery seam for notification records
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: Notification) -> anyhow::Result<()>;
}

/// Default sink: persists the record to the notifications table
pub struct StoreNotificationSink {
    store: EngineStore,
}

impl StoreNotificationSink {
    pub fn new(store: EngineStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationSink for StoreNotificationSink {
    async fn deliver(&self, notification: Notification) -> anyhow::Result<()> {
        self.store.insert_notification(&notification)?;
        Ok(())
    }
}

/// Emit through the sink, downgrading any failure to a warning
///
/// Used after the order/payment write has committed; the side effect must
/// never roll the commit back.
pub async fn emit_best_effort(sink: &dyn NotificationSink, notification: Notification) {
    let id = notification.id.clone();
    if let Err(e) = sink.deliver(notification).await {
        tracing::warn!(notification_id = %id, error = %e, "Notification delivery failed, continuing");
    }
}

/// Owner-facing queries and mutations over stored notifications
#[derive(Clone)]
pub struct NotificationService {
    store: EngineStore,
    list_limit: usize,
}

impl NotificationService {
    pub fn new(store: EngineStore, list_limit: usize) -> Self {
        Self { store, list_limit }
    }

    pub fn from_config(store: EngineStore, config: &EngineConfig) -> Self {
        Self::new(store, config.notification_list_limit)
    }

    /// Notifications addressed to a user, newest first, capped
    pub fn list_for_user(&self, user_id: &str) -> EngineResult<Vec<Notification>> {
        let mut list = self
            .store
            .notifications_where(|n| n.user_id.as_deref() == Some(user_id))?;
        list.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        list.truncate(self.list_limit);
        Ok(list)
    }

    /// Notifications addressed to a vendor, newest first, capped
    pub fn list_for_vendor(&self, vendor_id: &str) -> EngineResult<Vec<Notification>> {
        let mut list = self
            .store
            .notifications_where(|n| n.vendor_id.as_deref() == Some(vendor_id))?;
        list.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        list.truncate(self.list_limit);
        Ok(list)
    }

    /// Flip `is_read`; only the owner may do this
    pub fn mark_read(&self, notification_id: &str, requester_id: &str) -> EngineResult<Notification> {
        let Some(mut notification) = self.store.get_notification(notification_id)? else {
            return Err(EngineError::NotFound(format!(
                "notification {notification_id}"
            )));
        };
        if !notification.owned_by(requester_id) {
            return Err(EngineError::Unauthorized);
        }
        notification.is_read = true;
        self.store.update_notification(&notification)?;
        Ok(notification)
    }

    /// Delete a notification; only the owner may do this
    pub fn delete(&self, notification_id: &str, requester_id: &str) -> EngineResult<()> {
        let Some(notification) = self.store.get_notification(notification_id)? else {
            return Err(EngineError::NotFound(format!(
                "notification {notification_id}"
            )));
        };
        if !notification.owned_by(requester_id) {
            return Err(EngineError::Unauthorized);
        }
        self.store.delete_notification(notification_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::NotificationKind;

    fn service() -> (EngineStore, NotificationService) {
        let store = EngineStore::open_in_memory().unwrap();
        let service = NotificationService::new(store.clone(), 50);
        (store, service)
    }

    #[tokio::test]
    async fn test_store_sink_persists() {
        let (store, service) = service();
        let sink = StoreNotificationSink::new(store);
        let n = Notification::for_user("user-1", "Order Placed", "...", NotificationKind::OrderUpdate);
        sink.deliver(n).await.unwrap();

        assert_eq!(service.list_for_user("user-1").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_sink_is_swallowed() {
        struct FailingSink;

        #[async_trait]
        impl NotificationSink for FailingSink {
            async fn deliver(&self, _n: Notification) -> anyhow::Result<()> {
                anyhow::bail!("transport down")
            }
        }

        let n = Notification::for_user("user-1", "t", "m", NotificationKind::System);
        // Must not panic or propagate
        emit_best_effort(&FailingSink, n).await;
    }

    #[test]
    fn test_list_is_capped_and_newest_first() {
        let store = EngineStore::open_in_memory().unwrap();
        let service = NotificationService::new(store.clone(), 3);

        for i in 0..5 {
            let mut n =
                Notification::for_user("user-1", format!("n{i}"), "m", NotificationKind::Promo);
            n.created_at = i;
            store.insert_notification(&n).unwrap();
        }

        let list = service.list_for_user("user-1").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].title, "n4");
        assert_eq!(list[2].title, "n2");
    }

    #[test]
    fn test_from_config_applies_list_limit() {
        let store = EngineStore::open_in_memory().unwrap();
        let config = EngineConfig {
            data_dir: "/tmp/x".into(),
            db_file: "engine.redb".into(),
            default_match_radius_km: 10.0,
            notification_list_limit: 2,
        };
        let service = NotificationService::from_config(store.clone(), &config);

        for i in 0..4 {
            let mut n =
                Notification::for_user("user-1", format!("n{i}"), "m", NotificationKind::Promo);
            n.created_at = i;
            store.insert_notification(&n).unwrap();
        }

        assert_eq!(service.list_for_user("user-1").unwrap().len(), 2);
    }

    #[test]
    fn test_mark_read_requires_owner() {
        let (store, service) = service();
        let n = Notification::for_vendor("vendor-1", "New Order", "m", NotificationKind::OrderUpdate);
        store.insert_notification(&n).unwrap();

        assert!(matches!(
            service.mark_read(&n.id, "somebody-else"),
            Err(EngineError::Unauthorized)
        ));
        let updated = service.mark_read(&n.id, "vendor-1").unwrap();
        assert!(updated.is_read);
    }

    #[test]
    fn test_delete_requires_owner_and_existence() {
        let (store, service) = service();
        let n = Notification::for_user("user-1", "t", "m", NotificationKind::System);
        store.insert_notification(&n).unwrap();

        assert!(matches!(
            service.delete(&n.id, "user-2"),
            Err(EngineError::Unauthorized)
        ));
        service.delete(&n.id, "user-1").unwrap();
        assert!(matches!(
            service.delete(&n.id, "user-1"),
            Err(EngineError::NotFound(_))
        ));
    }
}
