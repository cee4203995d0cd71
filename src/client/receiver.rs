// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inbound push message handling.
//!
//! Each delivery is handled on its own; nothing is queued or retried.

use super::gate::{can_display, NotificationIdGenerator};
use super::platform::{LocalNotification, NotificationPlatform, Priority, TapAction};
use crate::config::NOTIFICATION_CHANNEL_ID;
use crate::models::PushMessage;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A push message as handed to the device.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteMessage {
    #[serde(default)]
    pub notification: Option<RemoteNotification>,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RemoteNotification {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl RemoteMessage {
    /// The message a subscribed device receives for an outbound topic send.
    pub fn from_push_message(message: &PushMessage) -> Self {
        Self {
            notification: Some(RemoteNotification {
                title: Some(message.message.notification.title.clone()),
                body: Some(message.message.notification.body.clone()),
            }),
            data: message.message.data.clone(),
        }
    }

    /// Title and body to display.
    ///
    /// The `notification` block wins; background deliveries may only carry
    /// the mirrored `data.title` / `data.body`.
    pub fn display_content(&self) -> Option<(&str, &str)> {
        fn non_empty(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        let from_notification = self.notification.as_ref().and_then(|n| {
            Some((
                non_empty(n.title.as_deref())?,
                non_empty(n.body.as_deref())?,
            ))
        });

        from_notification.or_else(|| {
            Some((
                non_empty(self.data.get("title").map(String::as_str))?,
                non_empty(self.data.get("body").map(String::as_str))?,
            ))
        })
    }
}

/// What became of one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOutcome {
    /// Shown with this notification id
    Displayed(i32),
    /// No title/body to show
    MissingContent,
    /// Permission gate closed; message dropped
    Suppressed,
    /// Platform refused the notification
    Failed,
}

/// Turns push deliveries into local notifications.
pub struct NotificationReceiver {
    platform: Arc<dyn NotificationPlatform>,
    ids: Arc<NotificationIdGenerator>,
}

impl NotificationReceiver {
    pub fn new(platform: Arc<dyn NotificationPlatform>, ids: Arc<NotificationIdGenerator>) -> Self {
        Self { platform, ids }
    }

    pub fn on_message_received(&self, message: &RemoteMessage) -> DisplayOutcome {
        let Some((title, body)) = message.display_content() else {
            tracing::debug!("Push message has no displayable content");
            return DisplayOutcome::MissingContent;
        };

        if !can_display(self.platform.as_ref()) {
            tracing::info!(
                sdk = self.platform.sdk_version(),
                "Notification permission missing, dropping push message"
            );
            return DisplayOutcome::Suppressed;
        }

        let notification = LocalNotification {
            id: self.ids.next_id(),
            channel_id: NOTIFICATION_CHANNEL_ID.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            priority: Priority::High,
            auto_cancel: true,
            tap_action: TapAction::None,
        };
        let id = notification.id;

        match self.platform.notify(notification) {
            Ok(()) => {
                tracing::debug!(notification_id = id, "Push notification displayed");
                DisplayOutcome::Displayed(id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to display push notification");
                DisplayOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::InMemoryNotificationCenter;
    use crate::client::platform::PermissionState;
    use crate::client::registrar::notification_channel;
    use serde_json::json;

    fn center(sdk: u32, permission: PermissionState) -> Arc<InMemoryNotificationCenter> {
        let center = Arc::new(InMemoryNotificationCenter::new(sdk, permission));
        center.create_channel(&notification_channel()).unwrap();
        center
    }

    fn receiver(center: &Arc<InMemoryNotificationCenter>) -> NotificationReceiver {
        NotificationReceiver::new(center.clone(), Arc::new(NotificationIdGenerator::new()))
    }

    fn message(title: &str, body: &str) -> RemoteMessage {
        serde_json::from_value(json!({
            "notification": { "title": title, "body": body }
        }))
        .unwrap()
    }

    #[test]
    fn granted_permission_displays_exact_strings() {
        let center = center(34, PermissionState::Granted);

        let outcome = receiver(&center).on_message_received(&message("T", "B"));

        assert!(matches!(outcome, DisplayOutcome::Displayed(_)));
        let posted = center.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].title, "T");
        assert_eq!(posted[0].body, "B");
        assert_eq!(posted[0].channel_id, NOTIFICATION_CHANNEL_ID);
        assert_eq!(posted[0].priority, Priority::High);
        assert!(posted[0].auto_cancel);
    }

    #[test]
    fn old_platform_displays_without_permission() {
        let center = center(30, PermissionState::Denied);

        let outcome = receiver(&center).on_message_received(&message("T", "B"));

        assert!(matches!(outcome, DisplayOutcome::Displayed(_)));
        assert_eq!(center.posted().len(), 1);
    }

    #[test]
    fn denied_permission_drops_message() {
        let center = center(33, PermissionState::Denied);

        let outcome = receiver(&center).on_message_received(&message("T", "B"));

        assert_eq!(outcome, DisplayOutcome::Suppressed);
        assert!(center.posted().is_empty());
    }

    #[test]
    fn missing_content_shows_nothing() {
        let center = center(34, PermissionState::Granted);
        let receiver = receiver(&center);

        assert_eq!(
            receiver.on_message_received(&RemoteMessage::default()),
            DisplayOutcome::MissingContent
        );
        assert_eq!(
            receiver.on_message_received(&message("T", "")),
            DisplayOutcome::MissingContent
        );
        assert!(center.posted().is_empty());
    }

    #[test]
    fn data_only_message_falls_back_to_data_fields() {
        let center = center(34, PermissionState::Granted);
        let message: RemoteMessage = serde_json::from_value(json!({
            "data": { "title": "T", "body": "B" }
        }))
        .unwrap();

        let outcome = receiver(&center).on_message_received(&message);

        assert!(matches!(outcome, DisplayOutcome::Displayed(_)));
        assert_eq!(center.posted()[0].title, "T");
    }

    #[test]
    fn consecutive_messages_coexist() {
        let center = center(34, PermissionState::Granted);
        let receiver = receiver(&center);

        receiver.on_message_received(&message("A", "1"));
        receiver.on_message_received(&message("B", "2"));

        assert_eq!(center.posted().len(), 2);
    }
}
