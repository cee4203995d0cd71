// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GymTrack relay API server
//!
//! Serves the routine data API and turns new predefined routines into
//! topic push notifications.

use gymtrack_relay::{
    config::Config,
    db::FirestoreDb,
    services::{FcmClient, FirebaseTokenVerifier, TriggerService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        trigger_dedupe = config.trigger_dedupe,
        "Starting GymTrack relay"
    );

    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    let fcm = FcmClient::new(&config.fcm_endpoint, &config.gcp_project_id)?;
    let mut trigger_service = TriggerService::new(Arc::new(fcm));
    if config.trigger_dedupe {
        trigger_service = trigger_service.with_ledger(Arc::new(db.clone()));
        tracing::info!("Trigger idempotency ledger enabled");
    }

    let auth_verifier = Arc::new(FirebaseTokenVerifier::new(&config.gcp_project_id)?);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        auth_verifier,
        trigger_service,
    });

    let app = gymtrack_relay::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,gymtrack_relay=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
