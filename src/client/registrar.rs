// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Startup registration for notifications.
//!
//! Four steps, in order:
//! 1. Ask for the notification permission where the platform requires it
//! 2. Create the shared notification channel
//! 3. Subscribe to the new-routines topic
//! 4. Schedule the daily reminder (keep-existing)
//!
//! Every step is single-attempt and logged. A failed step leaves the app
//! working without that part of notifications.

use super::gate::requires_runtime_permission;
use super::platform::{
    EnqueueOutcome, ExistingPeriodicWorkPolicy, Importance, NotificationChannel,
    NotificationPlatform, PermissionState, TopicMessaging, WorkScheduler, Worker,
};
use super::reminder::reminder_work_request;
use crate::config::{NEW_ROUTINES_TOPIC, NOTIFICATION_CHANNEL_ID};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// The channel used for both push messages and reminders.
pub fn notification_channel() -> NotificationChannel {
    NotificationChannel {
        id: NOTIFICATION_CHANNEL_ID.to_string(),
        name: "Rutinas".to_string(),
        description: "Nuevas rutinas y recordatorios de entrenamiento".to_string(),
        importance: Importance::Default,
    }
}

/// Result of one registration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReport {
    pub permission: PermissionState,
    pub channel_ready: bool,
    pub subscribed: bool,
    /// `None` if the scheduler refused the request
    pub reminder: Option<EnqueueOutcome>,
}

pub struct NotificationRegistrar {
    platform: Arc<dyn NotificationPlatform>,
    messaging: Arc<dyn TopicMessaging>,
    scheduler: Arc<dyn WorkScheduler>,
    reminder: Arc<dyn Worker>,
}

impl NotificationRegistrar {
    pub fn new(
        platform: Arc<dyn NotificationPlatform>,
        messaging: Arc<dyn TopicMessaging>,
        scheduler: Arc<dyn WorkScheduler>,
        reminder: Arc<dyn Worker>,
    ) -> Self {
        Self {
            platform,
            messaging,
            scheduler,
            reminder,
        }
    }

    /// Run all steps as a background task.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<RegistrationReport> {
        tokio::spawn(async move { self.run().await })
    }

    /// Run all steps in order. Never fails.
    pub async fn run(&self) -> RegistrationReport {
        let permission = self.ensure_permission().await;
        let channel_ready = self.create_channel();
        let subscribed = self.subscribe().await;
        let reminder = self.schedule_reminder();

        let report = RegistrationReport {
            permission,
            channel_ready,
            subscribed,
            reminder,
        };
        tracing::info!(report = ?report, "Notification registration finished");
        report
    }

    /// Prompt only where the permission exists and is not yet granted.
    pub async fn ensure_permission(&self) -> PermissionState {
        let current = self.platform.permission_state();
        if !requires_runtime_permission(self.platform.as_ref())
            || current == PermissionState::Granted
        {
            return current;
        }

        let answer = self.platform.request_permission().await;
        if answer != PermissionState::Granted {
            tracing::info!(answer = ?answer, "Notification permission not granted");
        }
        answer
    }

    pub fn create_channel(&self) -> bool {
        match self.platform.create_channel(&notification_channel()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create notification channel");
                false
            }
        }
    }

    pub async fn subscribe(&self) -> bool {
        match self.messaging.subscribe_to_topic(NEW_ROUTINES_TOPIC).await {
            Ok(()) => {
                tracing::info!(topic = NEW_ROUTINES_TOPIC, "Subscribed to topic");
                true
            }
            Err(e) => {
                tracing::warn!(topic = NEW_ROUTINES_TOPIC, error = %e, "Topic subscription failed");
                false
            }
        }
    }

    /// Enqueue the daily reminder, keeping any existing schedule.
    pub fn schedule_reminder(&self) -> Option<EnqueueOutcome> {
        let request = reminder_work_request(self.reminder.clone());
        let name = request.unique_name.clone();

        match self
            .scheduler
            .enqueue_unique_periodic_work(request, ExistingPeriodicWorkPolicy::Keep)
        {
            Ok(outcome) => {
                tracing::debug!(work = %name, outcome = ?outcome, "Reminder work enqueued");
                Some(outcome)
            }
            Err(e) => {
                tracing::warn!(work = %name, error = %e, "Failed to schedule reminder");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::gate::NotificationIdGenerator;
    use crate::client::memory::{InMemoryNotificationCenter, InMemoryTopicMessaging};
    use crate::client::reminder::ReminderWorker;
    use crate::client::scheduler::TokioWorkScheduler;

    struct Device {
        center: Arc<InMemoryNotificationCenter>,
        messaging: Arc<InMemoryTopicMessaging>,
        scheduler: Arc<TokioWorkScheduler>,
        registrar: NotificationRegistrar,
    }

    fn device(center: InMemoryNotificationCenter) -> Device {
        let center = Arc::new(center);
        let messaging = Arc::new(InMemoryTopicMessaging::new());
        let scheduler = Arc::new(TokioWorkScheduler::new());
        let reminder = Arc::new(ReminderWorker::new(
            center.clone(),
            Arc::new(NotificationIdGenerator::new()),
        ));
        let registrar =
            NotificationRegistrar::new(center.clone(), messaging.clone(), scheduler.clone(), reminder);
        Device {
            center,
            messaging,
            scheduler,
            registrar,
        }
    }

    #[tokio::test]
    async fn full_registration_on_new_platform() {
        let d = device(
            InMemoryNotificationCenter::new(34, PermissionState::NotDetermined)
                .answer_prompts_with(PermissionState::Granted),
        );

        let report = d.registrar.run().await;

        assert_eq!(report.permission, PermissionState::Granted);
        assert!(report.channel_ready);
        assert!(report.subscribed);
        assert_eq!(report.reminder, Some(EnqueueOutcome::Enqueued));
        assert_eq!(d.center.permission_requests(), 1);
        assert!(d.center.channel(NOTIFICATION_CHANNEL_ID).is_some());
        assert!(d.messaging.is_subscribed(NEW_ROUTINES_TOPIC));
    }

    #[tokio::test]
    async fn old_platform_is_never_prompted() {
        let d = device(InMemoryNotificationCenter::new(31, PermissionState::NotDetermined));

        d.registrar.run().await;

        assert_eq!(d.center.permission_requests(), 0);
    }

    #[tokio::test]
    async fn denied_permission_does_not_stop_registration() {
        let d = device(
            InMemoryNotificationCenter::new(33, PermissionState::NotDetermined)
                .answer_prompts_with(PermissionState::Denied),
        );
        d.messaging.set_failing(true);

        let report = d.registrar.run().await;

        assert_eq!(report.permission, PermissionState::Denied);
        assert!(report.channel_ready);
        assert!(!report.subscribed);
        assert_eq!(report.reminder, Some(EnqueueOutcome::Enqueued));
    }

    #[tokio::test]
    async fn repeated_scheduling_keeps_one_job() {
        let d = device(InMemoryNotificationCenter::new(34, PermissionState::Granted));

        assert_eq!(
            d.registrar.schedule_reminder(),
            Some(EnqueueOutcome::Enqueued)
        );
        assert_eq!(
            d.registrar.schedule_reminder(),
            Some(EnqueueOutcome::KeptExisting)
        );
        assert_eq!(d.scheduler.active_work_count(), 1);
    }

    #[tokio::test]
    async fn repeated_runs_are_idempotent() {
        let d = device(InMemoryNotificationCenter::new(34, PermissionState::Granted));
        let registrar = Arc::new(d.registrar);

        registrar.clone().spawn().await.unwrap();
        registrar.clone().spawn().await.unwrap();

        assert_eq!(d.center.channel_count(), 1);
        assert_eq!(d.messaging.subscription_count(), 1);
        assert_eq!(d.scheduler.active_work_count(), 1);
    }
}
