// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device side of the new-routine relay.
//!
//! Platform services sit behind the traits in [`platform`]; everything else
//! is written against those traits.

pub mod auth_state;
pub mod gate;
pub mod memory;
pub mod messaging;
pub mod platform;
pub mod receiver;
pub mod registrar;
pub mod reminder;
pub mod scheduler;

pub use auth_state::{AuthSession, CurrentUser};
pub use gate::{can_display, requires_runtime_permission, NotificationIdGenerator};
pub use memory::{InMemoryNotificationCenter, InMemoryTopicMessaging};
pub use messaging::FcmTopicMessaging;
pub use platform::{
    EnqueueOutcome, ExistingPeriodicWorkPolicy, LocalNotification, NotificationChannel,
    NotificationPlatform, PermissionState, PlatformError, TopicMessaging, WorkResult,
    WorkScheduler, Worker,
};
pub use receiver::{DisplayOutcome, NotificationReceiver, RemoteMessage};
pub use registrar::{notification_channel, NotificationRegistrar, RegistrationReport};
pub use reminder::{ReminderWorker, REMINDER_WORK_NAME};
pub use scheduler::TokioWorkScheduler;
