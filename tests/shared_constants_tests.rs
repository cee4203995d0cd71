// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The server and device halves must agree on these values; a mismatch
//! silently drops every broadcast.

use gymtrack_relay::client::{notification_channel, REMINDER_WORK_NAME};
use gymtrack_relay::config::{NEW_ROUTINES_TOPIC, NOTIFICATION_CHANNEL_ID};
use gymtrack_relay::services::build_new_routine_payload;

#[test]
fn test_broadcast_topic_matches_subscription_topic() {
    let payload = build_new_routine_payload(Some("Leg Day"));
    assert_eq!(payload.topic, NEW_ROUTINES_TOPIC);
    assert_eq!(NEW_ROUTINES_TOPIC, "nuevas_rutinas");
}

#[test]
fn test_channel_id_is_shared() {
    assert_eq!(notification_channel().id, NOTIFICATION_CHANNEL_ID);
    assert_eq!(NOTIFICATION_CHANNEL_ID, "rutinas_channel");
}

#[test]
fn test_reminder_work_name() {
    assert_eq!(REMINDER_WORK_NAME, "recordatorio_diario");
}
