// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! New predefined routine → topic broadcast.
//!
//! Runs once per Firestore `created` event. The document write has already
//! committed, so nothing here can fail the event: push errors are logged and
//! the handler moves on.
//!
//! Eventarc delivers at least once. Without a ledger a redelivered event
//! sends a second notification.

use crate::config::NEW_ROUTINES_TOPIC;
use crate::error::AppError;
use crate::models::{NotificationPayload, PredefinedRoutineCreatedEvent};
use crate::services::push::PushGateway;
use futures_util::future::BoxFuture;
use std::sync::Arc;

pub const NEW_ROUTINE_TITLE: &str = "💪 ¡Nueva rutina disponible!";
/// Substituted when the document has no usable routine name.
pub const ROUTINE_NAME_PLACEHOLDER: &str = "una rutina";

/// Records which routines have already been announced.
pub trait NotificationLedger: Send + Sync {
    /// `Ok(true)` if this call recorded the routine, `Ok(false)` if it was
    /// already present.
    fn claim(&self, routine_id: &str) -> BoxFuture<'_, Result<bool, AppError>>;
}

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Sent,
    SendFailed,
    /// Ledger says this routine was already announced
    Duplicate,
}

/// Build the broadcast for a new predefined routine.
///
/// The name is interpolated as stored; only an absent or empty name falls
/// back to the placeholder.
pub fn build_new_routine_payload(routine_name: Option<&str>) -> NotificationPayload {
    let name = routine_name
        .filter(|name| !name.is_empty())
        .unwrap_or(ROUTINE_NAME_PLACEHOLDER);

    NotificationPayload {
        title: NEW_ROUTINE_TITLE.to_string(),
        body: format!("Se ha publicado {}", name),
        topic: NEW_ROUTINES_TOPIC.to_string(),
    }
}

/// Relays predefined-routine creation events to the push gateway.
pub struct TriggerService {
    gateway: Arc<dyn PushGateway>,
    ledger: Option<Arc<dyn NotificationLedger>>,
}

impl TriggerService {
    pub fn new(gateway: Arc<dyn PushGateway>) -> Self {
        Self {
            gateway,
            ledger: None,
        }
    }

    /// Skip events whose routine the ledger has already seen.
    pub fn with_ledger(mut self, ledger: Arc<dyn NotificationLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Handle one creation event. Never returns an error.
    pub async fn handle_predefined_routine_created(
        &self,
        event: &PredefinedRoutineCreatedEvent,
    ) -> RelayOutcome {
        let routine_id = event.document_id.as_str();

        if let Some(ledger) = &self.ledger {
            match ledger.claim(routine_id).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::info!(routine_id, "Routine already announced, skipping broadcast");
                    return RelayOutcome::Duplicate;
                }
                Err(e) => {
                    // An unreachable ledger must not silence the announcement.
                    tracing::warn!(
                        routine_id,
                        error = %e,
                        "Notification ledger unavailable, sending anyway"
                    );
                }
            }
        }

        if event.routine_name().is_none() {
            tracing::warn!(
                routine_id,
                "Predefined routine has no name, using placeholder"
            );
        }

        let payload = build_new_routine_payload(event.routine_name());
        let message = payload.to_push_message();

        match self.gateway.send(&message).await {
            Ok(()) => {
                tracing::info!(
                    routine_id,
                    topic = %payload.topic,
                    body = %payload.body,
                    "New routine notification sent"
                );
                RelayOutcome::Sent
            }
            Err(e) => {
                tracing::error!(
                    routine_id,
                    topic = %payload.topic,
                    error = %e,
                    "Failed to send new routine notification"
                );
                RelayOutcome::SendFailed
            }
        }
    }
}
