//! Host notification capability.

use crate::{PermissionState, PlatformResult};
use async_trait::async_trait;
use notification_feed::Notification;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio::sync::mpsc;

/// What the platform is asked to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayOptions {
    pub title: String,
    pub body: String,
    /// Platform dedup key. Displays sharing a tag replace each other.
    pub tag: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl DisplayOptions {
    pub fn for_notification(notification: &Notification) -> Self {
        Self {
            title: notification.title.clone(),
            body: notification.body.clone(),
            tag: Self::tag_for(&notification.id),
            data: notification.payload.clone(),
        }
    }

    pub fn tag_for(id: &str) -> String {
        format!("notification-{id}")
    }
}

/// Lifecycle events of one displayed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Shown,
    Clicked,
    Closed,
    Error(String),
}

/// Closes a displayed notification. Closing twice is harmless.
pub trait DisplayHandle: Send + Sync {
    fn close(&self);
}

/// A notification the platform accepted for display.
pub struct DisplayedNotification {
    pub events: mpsc::UnboundedReceiver<DisplayEvent>,
    pub handle: Box<dyn DisplayHandle>,
}

impl fmt::Debug for DisplayedNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayedNotification").finish_non_exhaustive()
    }
}

/// Operating-system notification API provided by the host.
#[async_trait]
pub trait NotificationPlatform: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Permission as the platform currently reports it.
    fn permission(&self) -> PermissionState;

    /// Prompt the user. Resolves to the permission after the prompt; a
    /// dismissed prompt resolves to `Default`.
    async fn request_permission(&self) -> PlatformResult<PermissionState>;

    fn display(&self, options: DisplayOptions) -> PlatformResult<DisplayedNotification>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_from_notification() {
        let notification = Notification::new("42", "campaign", "Approved")
            .with_body("Spring promo is live")
            .with_payload(json!({ "campaignId": 7 }));

        let options = DisplayOptions::for_notification(&notification);
        assert_eq!(options.tag, "notification-42");
        assert_eq!(options.title, "Approved");
        assert_eq!(options.body, "Spring promo is live");
        assert_eq!(options.data["campaignId"], 7);
    }

    #[test]
    fn test_same_id_same_tag() {
        let a = DisplayOptions::for_notification(&Notification::new("9", "info", "a"));
        let b = DisplayOptions::for_notification(&Notification::new("9", "info", "b"));
        assert_eq!(a.tag, b.tag);
    }
}
