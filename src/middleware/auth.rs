// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase ID token authentication middleware.

use crate::services::AuthError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user, inserted into request extensions.
///
/// Handlers receive the caller explicitly instead of looking up a global
/// session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

/// Middleware that requires a valid Firebase ID token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request.headers().get(header::AUTHORIZATION);

    let user = state
        .auth_verifier
        .verify_id_token(auth_header)
        .await
        .map_err(|err| match err {
            AuthError::Unauthorized(reason) => {
                tracing::debug!(reason = %reason, "Rejected request: invalid ID token");
                StatusCode::UNAUTHORIZED
            }
            AuthError::Transient(reason) => {
                tracing::error!(reason = %reason, "ID token verification transient failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    let is_admin = state.config.is_admin(&user.uid);
    request.extensions_mut().insert(AuthUser {
        uid: user.uid,
        email: user.email,
        is_admin,
    });

    Ok(next.run(request).await)
}
