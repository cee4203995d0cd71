// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use gymtrack_relay::error::AppError;
use gymtrack_relay::models::RoutineInput;
use validator::Validate;

async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let (status, json) = body_json(AppError::Forbidden("admins only".to_string())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
    assert_eq!(json["details"], "admins only");

    let (status, json) = body_json(AppError::NotFound("Routine x not found".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let (status, json) = body_json(AppError::Database("connection reset".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "database_error");
    assert!(json.get("details").is_none());

    let (status, json) = body_json(AppError::Internal(anyhow::anyhow!("boom"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json.get("details").is_none());
}

#[test]
fn test_validation_errors_become_bad_request() {
    let input: RoutineInput = serde_json::from_value(serde_json::json!({
        "nombreRutina": "",
        "ejercicios": []
    }))
    .unwrap();

    let err: AppError = input.validate().unwrap_err().into();
    assert!(matches!(err, AppError::BadRequest(_)));
}
