// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification payloads and their push gateway wire format.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Title, body and destination topic for one broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub topic: String,
}

impl NotificationPayload {
    /// Wire form with title/body mirrored into `data`.
    ///
    /// Some platforms only hand the `data` block to background handlers.
    pub fn to_push_message(&self) -> PushMessage {
        let data = HashMap::from([
            ("title".to_string(), self.title.clone()),
            ("body".to_string(), self.body.clone()),
        ]);

        PushMessage {
            message: TopicMessage {
                topic: self.topic.clone(),
                notification: PushNotification {
                    title: self.title.clone(),
                    body: self.body.clone(),
                },
                data,
            },
        }
    }
}

/// Request body for the FCM HTTP v1 `messages:send` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub message: TopicMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMessage {
    pub topic: String,
    pub notification: PushNotification,
    pub data: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
}
