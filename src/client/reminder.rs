// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily motivational reminder job.

use super::gate::{can_display, NotificationIdGenerator};
use super::platform::{
    LocalNotification, NotificationPlatform, PeriodicWorkRequest, Priority, TapAction, WorkResult,
    Worker,
};
use crate::config::NOTIFICATION_CHANNEL_ID;
use futures_util::future::BoxFuture;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Unique scheduler name; re-enqueueing under it keeps the existing job.
pub const REMINDER_WORK_NAME: &str = "recordatorio_diario";
pub const REMINDER_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderMessage {
    pub title: &'static str,
    pub body: &'static str,
}

pub const REMINDER_MESSAGES: [ReminderMessage; 4] = [
    ReminderMessage {
        title: "🏋️ ¡Hora de entrenar!",
        body: "Tu rutina te está esperando. ¡No la dejes para mañana!",
    },
    ReminderMessage {
        title: "🔥 ¡Sigue así!",
        body: "Cada entrenamiento cuenta. Abre GymTrack y continúa tu progreso.",
    },
    ReminderMessage {
        title: "💪 ¿Listo para sudar?",
        body: "Elige una rutina y dale caña hoy.",
    },
    ReminderMessage {
        title: "⏱️ Solo 20 minutos",
        body: "Un entrenamiento corto es mejor que ninguno.",
    },
];

/// Uniform choice over the fixed message set.
pub fn pick_message<R: Rng + ?Sized>(rng: &mut R) -> ReminderMessage {
    *REMINDER_MESSAGES
        .choose(rng)
        .unwrap_or(&REMINDER_MESSAGES[0])
}

/// Shows one reminder per run, behind the same gate as push messages.
pub struct ReminderWorker {
    platform: Arc<dyn NotificationPlatform>,
    ids: Arc<NotificationIdGenerator>,
}

impl ReminderWorker {
    pub fn new(platform: Arc<dyn NotificationPlatform>, ids: Arc<NotificationIdGenerator>) -> Self {
        Self { platform, ids }
    }

    /// Tapping opens the main screen on a fresh task stack.
    pub fn build_notification(&self, message: ReminderMessage) -> LocalNotification {
        LocalNotification {
            id: self.ids.next_id(),
            channel_id: NOTIFICATION_CHANNEL_ID.to_string(),
            title: message.title.to_string(),
            body: message.body.to_string(),
            priority: Priority::Default,
            auto_cancel: true,
            tap_action: TapAction::LaunchMainEntry {
                new_task: true,
                clear_task: true,
            },
        }
    }

    /// Run once. Suppressed or failed display still counts as success.
    pub fn run_once(&self) -> WorkResult {
        if !can_display(self.platform.as_ref()) {
            tracing::info!("Notification permission missing, skipping reminder");
            return WorkResult::Success;
        }

        let message = pick_message(&mut rand::thread_rng());
        let notification = self.build_notification(message);

        match self.platform.notify(notification) {
            Ok(()) => tracing::debug!(title = message.title, "Reminder displayed"),
            Err(e) => tracing::warn!(error = %e, "Failed to display reminder"),
        }

        WorkResult::Success
    }
}

impl Worker for ReminderWorker {
    fn do_work(&self) -> BoxFuture<'_, WorkResult> {
        Box::pin(async move { self.run_once() })
    }
}

/// The daily reminder as a periodic work request.
pub fn reminder_work_request(worker: Arc<dyn Worker>) -> PeriodicWorkRequest {
    PeriodicWorkRequest {
        unique_name: REMINDER_WORK_NAME.to_string(),
        interval: REMINDER_INTERVAL,
        worker,
    }
}
