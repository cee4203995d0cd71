// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device platform seams: notification display, topic messaging and
//! background work scheduling.

use futures_util::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;

/// First platform version that enforces the runtime "post notifications"
/// permission.
pub const POST_NOTIFICATIONS_MIN_SDK: u32 = 33;

/// Runtime notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// Never asked
    NotDetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Low,
    Default,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Default,
    High,
}

/// User-visible grouping for a class of notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: Importance,
}

/// What happens when the user taps a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapAction {
    None,
    /// Open the app's main entry point
    LaunchMainEntry { new_task: bool, clear_task: bool },
}

/// A notification ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNotification {
    pub id: i32,
    pub channel_id: String,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    /// Dismiss when tapped
    pub auto_cancel: bool,
    pub tap_action: TapAction,
}

/// Platform call failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    #[error("notification permission not granted")]
    PermissionDenied,

    #[error("platform service unavailable: {0}")]
    Unavailable(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Local notification surface of the device.
pub trait NotificationPlatform: Send + Sync {
    /// Platform API level.
    fn sdk_version(&self) -> u32;

    fn permission_state(&self) -> PermissionState;

    /// Ask the user; resolves with their answer.
    fn request_permission(&self) -> BoxFuture<'_, PermissionState>;

    /// Create a channel. Re-creating an existing id is a no-op.
    fn create_channel(&self, channel: &NotificationChannel) -> Result<(), PlatformError>;

    fn notify(&self, notification: LocalNotification) -> Result<(), PlatformError>;
}

/// Device registration with the push gateway's topics.
pub trait TopicMessaging: Send + Sync {
    /// Subscribe this device. Subscribing twice is a no-op.
    fn subscribe_to_topic<'a>(&'a self, topic: &'a str) -> BoxFuture<'a, Result<(), PlatformError>>;
}

/// Result reported back to the scheduler after one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkResult {
    Success,
    Retry,
    Failure,
}

/// A unit of background work.
pub trait Worker: Send + Sync {
    fn do_work(&self) -> BoxFuture<'_, WorkResult>;
}

/// What to do when unique work with the same name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingPeriodicWorkPolicy {
    /// Leave the existing schedule untouched
    Keep,
    /// Cancel the existing schedule and start the new one
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Enqueued,
    KeptExisting,
    Replaced,
}

/// Periodic work identified by a unique name.
#[derive(Clone)]
pub struct PeriodicWorkRequest {
    pub unique_name: String,
    pub interval: Duration,
    pub worker: Arc<dyn Worker>,
}

/// OS-level background scheduler.
pub trait WorkScheduler: Send + Sync {
    fn enqueue_unique_periodic_work(
        &self,
        request: PeriodicWorkRequest,
        policy: ExistingPeriodicWorkPolicy,
    ) -> Result<EnqueueOutcome, PlatformError>;
}
