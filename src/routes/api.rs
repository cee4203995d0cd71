// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.
//!
//! Personal and predefined routines go through the same repository calls;
//! only the collection and the permission check differ.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Favorite, Routine, RoutineInput, RoutineTarget, RoutineView};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

/// API routes (require authentication via Firebase ID token).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/routines", get(list_user_routines).post(create_user_routine))
        .route(
            "/api/routines/{id}",
            get(get_user_routine)
                .put(update_user_routine)
                .delete(delete_user_routine),
        )
        .route(
            "/api/predefined-routines",
            get(list_predefined_routines).post(create_predefined_routine),
        )
        .route(
            "/api/predefined-routines/{id}",
            get(get_predefined_routine)
                .put(update_predefined_routine)
                .delete(delete_predefined_routine),
        )
        .route("/api/favorites", get(list_favorites))
        .route(
            "/api/favorites/{target}/{id}",
            put(add_favorite).delete(remove_favorite),
        )
}

// ─── Current User ────────────────────────────────────────────

#[derive(Serialize)]
pub struct MeResponse {
    pub uid: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

async fn get_me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        uid: user.uid,
        email: user.email,
        is_admin: user.is_admin,
    })
}

// ─── Shared Repository Helpers ───────────────────────────────

/// Who may write to a target collection.
fn ensure_can_write(user: &AuthUser, target: RoutineTarget) -> Result<()> {
    match target {
        RoutineTarget::User => Ok(()),
        RoutineTarget::Predefined if user.is_admin => Ok(()),
        RoutineTarget::Predefined => Err(AppError::Forbidden(
            "only administrators can modify predefined routines".to_string(),
        )),
    }
}

/// Fetch a routine the caller is allowed to see.
///
/// Someone else's personal routine is reported as missing.
async fn load_visible(
    state: &AppState,
    user: &AuthUser,
    target: RoutineTarget,
    id: &str,
) -> Result<Routine> {
    let routine = state
        .db
        .get_routine(target, id)
        .await?
        .filter(|routine| match target {
            RoutineTarget::User => routine.owner_uid.as_deref() == Some(user.uid.as_str()),
            RoutineTarget::Predefined => true,
        })
        .ok_or_else(|| AppError::NotFound(format!("Routine {} not found", id)))?;

    Ok(routine)
}

async fn create_routine(
    state: &AppState,
    user: &AuthUser,
    target: RoutineTarget,
    input: RoutineInput,
) -> Result<(StatusCode, Json<RoutineView>)> {
    ensure_can_write(user, target)?;
    input.validate()?;

    let owner_uid = match target {
        RoutineTarget::User => Some(user.uid.clone()),
        RoutineTarget::Predefined => None,
    };
    let routine = input.into_routine(owner_uid, now_rfc3339());

    state.db.create_routine(target, &routine).await?;

    tracing::info!(
        uid = %user.uid,
        routine_id = %routine.id,
        target = target.as_str(),
        "Routine created via API"
    );

    Ok((StatusCode::CREATED, Json(routine.into())))
}

async fn update_routine(
    state: &AppState,
    user: &AuthUser,
    target: RoutineTarget,
    id: &str,
    input: RoutineInput,
) -> Result<Json<RoutineView>> {
    ensure_can_write(user, target)?;
    input.validate()?;

    let mut routine = load_visible(state, user, target, id).await?;
    input.apply_to(&mut routine);
    state.db.update_routine(target, &routine).await?;

    Ok(Json(routine.into()))
}

async fn delete_routine(
    state: &AppState,
    user: &AuthUser,
    target: RoutineTarget,
    id: &str,
) -> Result<StatusCode> {
    ensure_can_write(user, target)?;
    load_visible(state, user, target, id).await?;
    state.db.delete_routine(target, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ─── Personal Routines ───────────────────────────────────────

async fn list_user_routines(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<RoutineView>>> {
    let routines = state
        .db
        .list_routines(RoutineTarget::User, Some(&user.uid))
        .await?;
    Ok(Json(routines.into_iter().map(RoutineView::from).collect()))
}

async fn create_user_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<RoutineInput>,
) -> Result<(StatusCode, Json<RoutineView>)> {
    create_routine(&state, &user, RoutineTarget::User, input).await
}

async fn get_user_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<RoutineView>> {
    Ok(Json(
        load_visible(&state, &user, RoutineTarget::User, &id)
            .await?
            .into(),
    ))
}

async fn update_user_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<RoutineInput>,
) -> Result<Json<RoutineView>> {
    update_routine(&state, &user, RoutineTarget::User, &id, input).await
}

async fn delete_user_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    delete_routine(&state, &user, RoutineTarget::User, &id).await
}

// ─── Predefined Routines ─────────────────────────────────────

async fn list_predefined_routines(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoutineView>>> {
    let routines = state
        .db
        .list_routines(RoutineTarget::Predefined, None)
        .await?;
    Ok(Json(routines.into_iter().map(RoutineView::from).collect()))
}

/// Create a predefined routine.
///
/// The Firestore write fires the new-routine event; the broadcast happens in
/// the event handler, not here.
async fn create_predefined_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<RoutineInput>,
) -> Result<(StatusCode, Json<RoutineView>)> {
    create_routine(&state, &user, RoutineTarget::Predefined, input).await
}

async fn get_predefined_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<RoutineView>> {
    Ok(Json(
        load_visible(&state, &user, RoutineTarget::Predefined, &id)
            .await?
            .into(),
    ))
}

async fn update_predefined_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<RoutineInput>,
) -> Result<Json<RoutineView>> {
    update_routine(&state, &user, RoutineTarget::Predefined, &id, input).await
}

async fn delete_predefined_routine(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    delete_routine(&state, &user, RoutineTarget::Predefined, &id).await
}

// ─── Favorites ───────────────────────────────────────────────

async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Favorite>>> {
    Ok(Json(state.db.list_favorites(&user.uid).await?))
}

fn parse_target(raw: &str) -> Result<RoutineTarget> {
    raw.parse().map_err(AppError::BadRequest)
}

async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((target, id)): Path<(String, String)>,
) -> Result<Json<Favorite>> {
    let target = parse_target(&target)?;
    load_visible(&state, &user, target, &id).await?;

    let favorite = Favorite {
        uid: user.uid.clone(),
        target,
        routine_id: id,
        added_at: now_rfc3339(),
    };
    state.db.set_favorite(&favorite).await?;

    Ok(Json(favorite))
}

async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((target, id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let target = parse_target(&target)?;
    state.db.remove_favorite(&user.uid, target, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
