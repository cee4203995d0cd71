// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process platform implementations.
//!
//! Used for local runs without a device and throughout the tests.

use super::gate::requires_runtime_permission;
use super::platform::{
    LocalNotification, NotificationChannel, NotificationPlatform, PermissionState, PlatformError,
    TopicMessaging,
};
use dashmap::{DashMap, DashSet};
use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Notification center that records what it is asked to show.
pub struct InMemoryNotificationCenter {
    sdk_version: u32,
    permission: Mutex<PermissionState>,
    /// What the simulated user answers when prompted
    prompt_answer: Mutex<PermissionState>,
    permission_requests: AtomicUsize,
    channels: DashMap<String, NotificationChannel>,
    posted: Mutex<Vec<LocalNotification>>,
}

impl InMemoryNotificationCenter {
    pub fn new(sdk_version: u32, permission: PermissionState) -> Self {
        Self {
            sdk_version,
            permission: Mutex::new(permission),
            prompt_answer: Mutex::new(PermissionState::Denied),
            permission_requests: AtomicUsize::new(0),
            channels: DashMap::new(),
            posted: Mutex::new(Vec::new()),
        }
    }

    /// Answer future permission prompts with `answer`.
    pub fn answer_prompts_with(self, answer: PermissionState) -> Self {
        *self
            .prompt_answer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = answer;
        self
    }

    pub fn set_permission(&self, state: PermissionState) {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    pub fn channel(&self, id: &str) -> Option<NotificationChannel> {
        self.channels.get(id).map(|c| c.clone())
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Notifications displayed so far, oldest first.
    pub fn posted(&self) -> Vec<LocalNotification> {
        self.posted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl NotificationPlatform for InMemoryNotificationCenter {
    fn sdk_version(&self) -> u32 {
        self.sdk_version
    }

    fn permission_state(&self) -> PermissionState {
        *self.permission.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request_permission(&self) -> BoxFuture<'_, PermissionState> {
        Box::pin(async move {
            self.permission_requests.fetch_add(1, Ordering::SeqCst);
            let answer = *self
                .prompt_answer
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.set_permission(answer);
            answer
        })
    }

    fn create_channel(&self, channel: &NotificationChannel) -> Result<(), PlatformError> {
        // Existing channels keep their original settings.
        self.channels
            .entry(channel.id.clone())
            .or_insert_with(|| channel.clone());
        Ok(())
    }

    fn notify(&self, notification: LocalNotification) -> Result<(), PlatformError> {
        if requires_runtime_permission(self) && self.permission_state() != PermissionState::Granted
        {
            return Err(PlatformError::PermissionDenied);
        }

        if !self.channels.contains_key(&notification.channel_id) {
            return Err(PlatformError::Rejected(format!(
                "unknown channel: {}",
                notification.channel_id
            )));
        }

        let mut posted = self.posted.lock().unwrap_or_else(PoisonError::into_inner);
        // Same id replaces the earlier notification, as on a device.
        posted.retain(|existing| existing.id != notification.id);
        posted.push(notification);
        Ok(())
    }
}

/// Topic registry for a single simulated device.
#[derive(Default)]
pub struct InMemoryTopicMessaging {
    topics: DashSet<String>,
    fail: AtomicBool,
}

impl InMemoryTopicMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }

    pub fn subscription_count(&self) -> usize {
        self.topics.len()
    }
}

impl TopicMessaging for InMemoryTopicMessaging {
    fn subscribe_to_topic<'a>(&'a self, topic: &'a str) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async move {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PlatformError::Unavailable(
                    "messaging service unreachable".to_string(),
                ));
            }
            self.topics.insert(topic.to_string());
            Ok(())
        })
    }
}
