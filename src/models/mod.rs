// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod event;
pub mod notification;
pub mod routine;

pub use event::{DocumentEventData, FirestoreValue, PredefinedRoutineCreatedEvent};
pub use notification::{NotificationPayload, PushMessage};
pub use routine::{
    Difficulty, Exercise, Favorite, Routine, RoutineInput, RoutineTarget, RoutineView,
};
