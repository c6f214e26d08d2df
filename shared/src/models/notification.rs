//! Notification Model

use serde::{Deserialize, Serialize};

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    OrderUpdate,
    Promo,
    System,
}

/// Append-only event record addressed to a user or a vendor
///
/// Exactly one of `user_id`/`vendor_id` is set. After creation only
/// `is_read` may change, and only the owner may flip or delete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: i64,
}

impl Notification {
    pub fn for_user(
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: crate::util::new_id(),
            user_id: Some(user_id.into()),
            vendor_id: None,
            title: title.into(),
            message: message.into(),
            kind,
            is_read: false,
            created_at: crate::util::now_millis(),
        }
    }

    pub fn for_vendor(
        vendor_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: crate::util::new_id(),
            user_id: None,
            vendor_id: Some(vendor_id.into()),
            title: title.into(),
            message: message.into(),
            kind,
            is_read: false,
            created_at: crate::util::now_millis(),
        }
    }

    /// Whether `identity` owns this notification
    pub fn owned_by(&self, identity: &str) -> bool {
        self.user_id.as_deref() == Some(identity) || self.vendor_id.as_deref() == Some(identity)
    }
}
