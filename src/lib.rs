// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GymTrack relay: routine data API and new-routine push notifications.
//!
//! The server side receives Firestore `created` events for predefined
//! routines and broadcasts them to the `nuevas_rutinas` topic. The `client`
//! module holds the device side: registration at startup, inbound message
//! display and the daily reminder job.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{FirebaseTokenVerifier, TriggerService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub auth_verifier: Arc<FirebaseTokenVerifier>,
    pub trigger_service: TriggerService,
}
