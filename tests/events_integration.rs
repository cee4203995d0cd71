// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for the Firestore event endpoint.
//!
//! Eventarc redelivers anything that is not 2xx, so every case here expects
//! 200; what differs is whether a push went out.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use gymtrack_relay::config::{FIRESTORE_CREATED_EVENT_TYPE, NEW_ROUTINES_TOPIC};
use tower::ServiceExt;

mod common;
use common::{create_test_app, routine_created_event};

const EVENT_URI: &str = "/events/predefined-routine-created";

fn event_request(event_type: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(EVENT_URI)
        .header("content-type", "application/json")
        .header("ce-id", "evt-1")
        .header("ce-specversion", "1.0")
        .header("ce-type", event_type)
        .header(
            "ce-subject",
            "documents/rutinas_predefinidas/leg-day",
        )
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_new_routine_is_broadcast() {
    let app = create_test_app();
    let body = routine_created_event("leg-day", Some("Leg Day")).to_string();

    let response = app
        .router
        .oneshot(event_request(FIRESTORE_CREATED_EVENT_TYPE, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let sent = app.push.sent();
    assert_eq!(sent.len(), 1);
    let message = &sent[0].message;
    assert_eq!(message.topic, NEW_ROUTINES_TOPIC);
    assert_eq!(message.notification.title, "💪 ¡Nueva rutina disponible!");
    assert_eq!(message.notification.body, "Se ha publicado Leg Day");
    assert_eq!(message.data["title"], message.notification.title);
    assert_eq!(message.data["body"], message.notification.body);
}

#[tokio::test]
async fn test_missing_name_uses_placeholder() {
    let app = create_test_app();
    let body = routine_created_event("unnamed", None).to_string();

    let response = app
        .router
        .oneshot(event_request(FIRESTORE_CREATED_EVENT_TYPE, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = app.push.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message.notification.body, "Se ha publicado una rutina");
}

#[tokio::test]
async fn test_name_is_sent_as_stored() {
    let app = create_test_app();
    let body = routine_created_event("padded", Some(" Leg Day ")).to_string();

    let response = app
        .router
        .oneshot(event_request(FIRESTORE_CREATED_EVENT_TYPE, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = app.push.sent();
    assert!(sent[0].message.notification.body.contains(" Leg Day "));
}

#[tokio::test]
async fn test_other_event_types_are_ignored() {
    let app = create_test_app();
    let body = routine_created_event("leg-day", Some("Leg Day")).to_string();

    let response = app
        .router
        .oneshot(event_request(
            "google.cloud.firestore.document.v1.updated",
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_acknowledged() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(event_request(FIRESTORE_CREATED_EVENT_TYPE, "not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_event_without_document_is_acknowledged() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(event_request(FIRESTORE_CREATED_EVENT_TYPE, "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_push_failure_is_acknowledged() {
    let app = create_test_app();
    app.push.set_failing(true);
    let body = routine_created_event("leg-day", Some("Leg Day")).to_string();

    let response = app
        .router
        .oneshot(event_request(FIRESTORE_CREATED_EVENT_TYPE, body))
        .await
        .unwrap();

    // No retry: the failure is logged and the event is done.
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_each_event_sends_once() {
    let app = create_test_app();

    for (id, name) in [("a", "Full Body"), ("b", "Push Pull")] {
        let body = routine_created_event(id, Some(name)).to_string();
        let response = app
            .router
            .clone()
            .oneshot(event_request(FIRESTORE_CREATED_EVENT_TYPE, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let bodies: Vec<String> = app
        .push
        .sent()
        .into_iter()
        .map(|m| m.message.notification.body)
        .collect();
    assert_eq!(
        bodies,
        vec!["Se ha publicado Full Body", "Se ha publicado Push Pull"]
    );
}
