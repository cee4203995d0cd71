// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod firebase_auth;
pub mod push;
pub mod trigger;

pub use firebase_auth::{AuthError, FirebaseTokenVerifier, VerifiedUser};
pub use push::{FcmClient, MockPushGateway, PushError, PushGateway};
pub use trigger::{build_new_routine_payload, NotificationLedger, RelayOutcome, TriggerService};
