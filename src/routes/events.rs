// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Eventarc routes for Firestore document events.

use crate::config::FIRESTORE_CREATED_EVENT_TYPE;
use crate::models::{DocumentEventData, PredefinedRoutineCreatedEvent};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::sync::Arc;

/// Event routes (called by Eventarc).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/events/predefined-routine-created",
        post(predefined_routine_created),
    )
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Handle a new document in the predefined-routines collection.
///
/// Always answers 200: a non-2xx makes Eventarc redeliver, and neither a bad
/// payload nor a push failure gets better by retrying.
async fn predefined_routine_created(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let event_id = header_str(&headers, "ce-id").unwrap_or("<none>");
    let event_type = header_str(&headers, "ce-type");

    tracing::info!(
        event_id,
        event_type = event_type.unwrap_or("<none>"),
        subject = header_str(&headers, "ce-subject").unwrap_or("<none>"),
        "Firestore event received"
    );

    if let Some(event_type) = event_type {
        if event_type != FIRESTORE_CREATED_EVENT_TYPE {
            tracing::warn!(event_id, event_type, "Ignoring unexpected event type");
            return StatusCode::OK;
        }
    }

    let data: DocumentEventData = match serde_json::from_slice(&body) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(event_id, error = %e, "Failed to parse Firestore event");
            return StatusCode::OK;
        }
    };

    let Some(event) = PredefinedRoutineCreatedEvent::from_event_data(data) else {
        tracing::warn!(event_id, "Firestore event carries no document, ignoring");
        return StatusCode::OK;
    };

    let outcome = state
        .trigger_service
        .handle_predefined_routine_created(&event)
        .await;

    tracing::info!(
        event_id,
        routine_id = %event.document_id,
        outcome = ?outcome,
        "Firestore event handled"
    );

    StatusCode::OK
}
